//! Configuration management for objectfilter.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::BTreeMap;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::{FilterSpec, FilterType, PatternSource};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "objectfilter";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "OBJECTFILTER_";

/// Name of the built-in credential-stripping preset.
pub const SECRETS_PRESET: &str = "secrets";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `OBJECTFILTER_`, nested keys
///    separated by `__`, e.g. `OBJECTFILTER_FILTER__FILTER_TYPE=include`)
/// 2. TOML config file at `~/.config/objectfilter/config.toml`
/// 3. Default values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filter settings applied when neither flags nor a preset set them.
    pub filter: FilterSpec,
    /// Named filter specifications.
    pub presets: BTreeMap<String, FilterSpec>,
    /// Output configuration.
    pub output: OutputConfig,
}

/// Output-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: FilterSpec::new()
                .with_filter_type(FilterType::Exclude)
                .with_recursive(true),
            presets: default_presets(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Default key patterns for credential-bearing fields.
fn default_secret_patterns() -> Vec<String> {
    vec![
        // Passwords
        r"(?i)^(password|passwd|pwd)$".to_string(),
        // Secrets and private keys
        r"(?i)secret|private[_-]?key".to_string(),
        // Tokens
        r"(?i)(access|refresh|id|auth|session)?[_-]?token$".to_string(),
        // API keys
        r"(?i)^api[_-]?key$".to_string(),
        // HTTP credentials
        r"(?i)^(authorization|cookie|set-cookie)$".to_string(),
    ]
}

/// Presets available without any configuration file.
fn default_presets() -> BTreeMap<String, FilterSpec> {
    let secrets = FilterSpec::new()
        .with_regex_filters(default_secret_patterns())
        .with_filter_type(FilterType::Exclude)
        .with_recursive(true);
    BTreeMap::from([(SECRETS_PRESET.to_string(), secrets)])
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::from_figment(&figment)
    }

    /// Extract and validate configuration from a prepared figment.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// Filtering itself tolerates bad input by passing objects through; a
    /// configuration file is held to a stricter standard so that mistakes
    /// surface before any document is processed.
    ///
    /// # Errors
    ///
    /// Returns an error if any filter specification is invalid.
    pub fn validate(&self) -> Result<()> {
        validate_spec("filter", &self.filter)?;
        for (name, spec) in &self.presets {
            validate_spec(&format!("presets.{name}"), spec)?;
        }
        Ok(())
    }

    /// Look up a preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPreset`] if no preset has that name.
    pub fn preset(&self, name: &str) -> Result<&FilterSpec> {
        self.presets
            .get(name)
            .ok_or_else(|| Error::unknown_preset(name))
    }

    /// Resolve the effective specification: `overrides` first, then the
    /// named preset, then the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPreset`] if `preset` names no preset.
    pub fn resolve(&self, preset: Option<&str>, overrides: FilterSpec) -> Result<FilterSpec> {
        let base = match preset {
            Some(name) => self.preset(name)?.clone().merged_over(&self.filter),
            None => self.filter.clone(),
        };
        Ok(overrides.merged_over(&base))
    }
}

fn validate_spec(section: &str, spec: &FilterSpec) -> Result<()> {
    if let Some(raw) = &spec.filter_type {
        raw.parse::<FilterType>()
            .map_err(|e| Error::config_validation(format!("{section}: {e}")))?;
    }

    if spec.max_depth == Some(0) {
        return Err(Error::config_validation(format!(
            "{section}: max_depth must be greater than 0"
        )));
    }

    for pattern in spec.regex_filters.iter().flat_map(|p| p.iter()) {
        if let PatternSource::Text(text) = pattern {
            if Regex::new(text).is_err() {
                return Err(Error::config_validation(format!(
                    "{section}: invalid regex pattern: {text}"
                )));
            }
        }
    }

    Ok(())
}
