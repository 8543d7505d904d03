//! Filter inputs: modes, filter groups and the filter specification.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Whether matched keys are kept or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Keep only the keys that match a filter.
    Include,
    /// Keep every key except the ones that match a filter.
    #[default]
    Exclude,
}

impl FilterType {
    /// The canonical lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::Exclude => "exclude",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "include" => Ok(Self::Include),
            "exclude" => Ok(Self::Exclude),
            other => Err(Error::UnknownFilterType {
                value: other.to_string(),
            }),
        }
    }
}

/// What include-mode filtering emits for a nested object that was not
/// matched itself and has no matching descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchPolicy {
    /// Leave the key out of the output.
    #[default]
    Omit,
    /// Emit the key with an empty object.
    KeepEmpty,
}

/// Exact-match key filters: a single key or a list of keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyFilters {
    /// A single key.
    One(String),
    /// Several keys.
    Many(Vec<String>),
}

impl KeyFilters {
    /// Iterate over the supplied keys.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        let keys = match self {
            Self::One(key) => std::slice::from_ref(key),
            Self::Many(keys) => keys.as_slice(),
        };
        keys.iter().map(String::as_str)
    }

    /// Returns true if at least one key was supplied.
    #[must_use]
    pub fn has_usable(&self) -> bool {
        match self {
            Self::One(_) => true,
            Self::Many(keys) => !keys.is_empty(),
        }
    }
}

impl From<&str> for KeyFilters {
    fn from(key: &str) -> Self {
        Self::One(key.to_string())
    }
}

impl From<String> for KeyFilters {
    fn from(key: String) -> Self {
        Self::One(key)
    }
}

impl<T: Into<String>> From<Vec<T>> for KeyFilters {
    fn from(keys: Vec<T>) -> Self {
        Self::Many(keys.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<String>, const N: usize> From<[T; N]> for KeyFilters {
    fn from(keys: [T; N]) -> Self {
        Self::Many(keys.into_iter().map(Into::into).collect())
    }
}

/// A pattern filter, either still in source form or already compiled.
#[derive(Debug, Clone)]
pub enum PatternSource {
    /// Pattern text, compiled during normalization.
    Text(String),
    /// A compiled pattern, used as-is.
    Compiled(Regex),
}

impl PatternSource {
    /// The pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Compiled(regex) => regex.as_str(),
        }
    }

    /// Compile the pattern with default (case-sensitive, unanchored) semantics.
    ///
    /// # Errors
    ///
    /// Returns the regex error if pattern text does not compile.
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        match self {
            Self::Text(text) => Regex::new(text),
            Self::Compiled(regex) => Ok(regex.clone()),
        }
    }
}

impl PartialEq for PatternSource {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Text(_), Self::Text(_)) | (Self::Compiled(_), Self::Compiled(_))
        ) && self.as_str() == other.as_str()
    }
}

impl From<&str> for PatternSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for PatternSource {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Regex> for PatternSource {
    fn from(regex: Regex) -> Self {
        Self::Compiled(regex)
    }
}

impl Serialize for PatternSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PatternSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Text)
    }
}

/// Pattern key filters: a single pattern or a list of patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternFilters {
    /// A single pattern.
    One(PatternSource),
    /// Several patterns.
    Many(Vec<PatternSource>),
}

impl PatternFilters {
    /// Iterate over the supplied patterns.
    pub fn iter(&self) -> impl Iterator<Item = &PatternSource> + '_ {
        let patterns = match self {
            Self::One(pattern) => std::slice::from_ref(pattern),
            Self::Many(patterns) => patterns.as_slice(),
        };
        patterns.iter()
    }

    /// Returns true if at least one pattern was supplied.
    #[must_use]
    pub fn has_usable(&self) -> bool {
        match self {
            Self::One(_) => true,
            Self::Many(patterns) => !patterns.is_empty(),
        }
    }
}

impl From<&str> for PatternFilters {
    fn from(text: &str) -> Self {
        Self::One(text.into())
    }
}

impl From<String> for PatternFilters {
    fn from(text: String) -> Self {
        Self::One(text.into())
    }
}

impl From<Regex> for PatternFilters {
    fn from(regex: Regex) -> Self {
        Self::One(regex.into())
    }
}

impl<T: Into<PatternSource>> From<Vec<T>> for PatternFilters {
    fn from(patterns: Vec<T>) -> Self {
        Self::Many(patterns.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PatternSource>, const N: usize> From<[T; N]> for PatternFilters {
    fn from(patterns: [T; N]) -> Self {
        Self::Many(patterns.into_iter().map(Into::into).collect())
    }
}

/// Everything needed to filter an object.
///
/// Every field is optional. `filter_type` stays a raw string so that
/// configuration files and other untyped sources can hand it over as-is;
/// an unrecognized value turns filtering into a passthrough.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    /// Exact-match key filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<KeyFilters>,
    /// Pattern key filters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex_filters: Option<PatternFilters>,
    /// `"include"` or `"exclude"`. Defaults to `"exclude"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<String>,
    /// Descend into nested objects. Defaults to `true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
    /// Maximum number of nested levels to descend into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Include-mode handling of unmatched nested objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmatched_branches: Option<BranchPolicy>,
}

impl FilterSpec {
    /// Create an empty specification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exact-match key filters.
    #[must_use]
    pub fn with_filters(mut self, filters: impl Into<KeyFilters>) -> Self {
        self.filters = Some(filters.into());
        self
    }

    /// Set the pattern key filters.
    #[must_use]
    pub fn with_regex_filters(mut self, patterns: impl Into<PatternFilters>) -> Self {
        self.regex_filters = Some(patterns.into());
        self
    }

    /// Set the filter type.
    #[must_use]
    pub fn with_filter_type(mut self, filter_type: FilterType) -> Self {
        self.filter_type = Some(filter_type.as_str().to_string());
        self
    }

    /// Enable or disable recursive filtering.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = Some(recursive);
        self
    }

    /// Set the maximum descent depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Set the include-mode policy for unmatched nested objects.
    #[must_use]
    pub fn with_unmatched_branches(mut self, policy: BranchPolicy) -> Self {
        self.unmatched_branches = Some(policy);
        self
    }

    /// Fill every unset field from `base`.
    #[must_use]
    pub fn merged_over(self, base: &FilterSpec) -> FilterSpec {
        FilterSpec {
            filters: self.filters.or_else(|| base.filters.clone()),
            regex_filters: self.regex_filters.or_else(|| base.regex_filters.clone()),
            filter_type: self.filter_type.or_else(|| base.filter_type.clone()),
            recursive: self.recursive.or(base.recursive),
            max_depth: self.max_depth.or(base.max_depth),
            unmatched_branches: self.unmatched_branches.or(base.unmatched_branches),
        }
    }
}
