//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::filter::{BranchPolicy, FilterSpec, FilterType, KeyFilters, PatternFilters};

/// Apply command arguments.
#[derive(Debug, Args)]
pub struct ApplyCommand {
    /// JSON document to filter (reads stdin when omitted or "-")
    pub input: Option<PathBuf>,

    /// Start from a named preset
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Exact key to match (repeatable; replaces the preset's keys)
    #[arg(short = 'f', long = "filter", value_name = "KEY")]
    pub filters: Vec<String>,

    /// Regex key pattern to match (repeatable; replaces the preset's patterns)
    #[arg(short = 'r', long = "regex", value_name = "REGEX")]
    pub regex: Vec<String>,

    /// Keep or drop the matched keys
    #[arg(short = 't', long, value_enum)]
    pub filter_type: Option<FilterTypeArg>,

    /// Only filter the top level
    #[arg(long)]
    pub flat: bool,

    /// Filter every nesting level, overriding a configured `recursive = false`
    #[arg(long, conflicts_with = "flat")]
    pub recursive: bool,

    /// Keep unmatched nested objects as {} in include mode
    #[arg(long)]
    pub keep_empty: bool,

    /// Maximum nesting depth to descend into
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_depth: Option<u32>,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

impl ApplyCommand {
    /// The specification set by flags alone. Unset fields fall back to the
    /// preset and the configured defaults.
    #[must_use]
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec {
            filters: (!self.filters.is_empty()).then(|| KeyFilters::from(self.filters.clone())),
            regex_filters: (!self.regex.is_empty())
                .then(|| PatternFilters::from(self.regex.clone())),
            filter_type: self
                .filter_type
                .map(|arg| FilterType::from(arg).as_str().to_string()),
            recursive: match (self.flat, self.recursive) {
                (true, _) => Some(false),
                (false, true) => Some(true),
                (false, false) => None,
            },
            max_depth: self.max_depth.map(|depth| depth as usize),
            unmatched_branches: self.keep_empty.then_some(BranchPolicy::KeepEmpty),
        }
    }

    /// The input path, or `None` for stdin.
    #[must_use]
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Filter type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterTypeArg {
    /// Keep only matching keys
    Include,
    /// Drop matching keys
    Exclude,
}

impl From<FilterTypeArg> for FilterType {
    fn from(arg: FilterTypeArg) -> Self {
        match arg {
            FilterTypeArg::Include => Self::Include,
            FilterTypeArg::Exclude => Self::Exclude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PatternSource;

    fn apply() -> ApplyCommand {
        ApplyCommand {
            input: None,
            preset: None,
            filters: Vec::new(),
            regex: Vec::new(),
            filter_type: None,
            flat: false,
            recursive: false,
            keep_empty: false,
            max_depth: None,
            compact: false,
        }
    }

    #[test]
    fn test_filter_type_conversion() {
        assert_eq!(FilterType::from(FilterTypeArg::Include), FilterType::Include);
        assert_eq!(FilterType::from(FilterTypeArg::Exclude), FilterType::Exclude);
    }

    #[test]
    fn test_to_spec_without_flags_is_empty() {
        assert_eq!(apply().to_spec(), FilterSpec::new());
    }

    #[test]
    fn test_to_spec_with_flags() {
        let cmd = ApplyCommand {
            filters: vec!["id".to_string(), "name".to_string()],
            regex: vec!["^x".to_string()],
            filter_type: Some(FilterTypeArg::Include),
            flat: true,
            keep_empty: true,
            max_depth: Some(3),
            ..apply()
        };
        let spec = cmd.to_spec();
        assert_eq!(spec.filters, Some(KeyFilters::from(["id", "name"])));
        assert_eq!(
            spec.regex_filters,
            Some(PatternFilters::Many(vec![PatternSource::from("^x")]))
        );
        assert_eq!(spec.filter_type.as_deref(), Some("include"));
        assert_eq!(spec.recursive, Some(false));
        assert_eq!(spec.max_depth, Some(3));
        assert_eq!(spec.unmatched_branches, Some(BranchPolicy::KeepEmpty));
    }

    #[test]
    fn test_recursive_flag_overrides_flat_base() {
        let base = FilterSpec::new().with_recursive(false);

        let cmd = ApplyCommand {
            recursive: true,
            ..apply()
        };
        assert_eq!(cmd.to_spec().merged_over(&base).recursive, Some(true));
        assert_eq!(apply().to_spec().merged_over(&base).recursive, Some(false));
    }

    #[test]
    fn test_key_flags_replace_preset_lists() {
        let preset = FilterSpec::new()
            .with_filters("password")
            .with_regex_filters("(?i)token");
        let cmd = ApplyCommand {
            regex: vec!["^x".to_string()],
            ..apply()
        };
        let spec = cmd.to_spec().merged_over(&preset);
        assert_eq!(
            spec.regex_filters,
            Some(PatternFilters::Many(vec![PatternSource::from("^x")]))
        );
        assert_eq!(spec.filters, Some(KeyFilters::from("password")));
    }

    #[test]
    fn test_input_path_dash_is_stdin() {
        let cmd = ApplyCommand {
            input: Some(PathBuf::from("-")),
            ..apply()
        };
        assert!(cmd.input_path().is_none());

        let cmd = ApplyCommand {
            input: Some(PathBuf::from("doc.json")),
            ..apply()
        };
        assert_eq!(cmd.input_path(), Some(&PathBuf::from("doc.json")));
    }
}
