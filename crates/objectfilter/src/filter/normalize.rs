//! Filter normalization.
//!
//! Resolves the single-or-list filter inputs into two canonical lists,
//! exact keys and compiled patterns, with overlap between them removed.

use regex::Regex;
use tracing::{trace, warn};

use super::spec::{KeyFilters, PatternFilters, PatternSource};

/// Normalized filters shared by every level of one filtering pass.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    exact: Vec<String>,
    patterns: Vec<Regex>,
}

impl FilterSet {
    /// Exact-match keys, none of which is matched by a pattern.
    #[must_use]
    pub fn exact_keys(&self) -> &[String] {
        &self.exact
    }

    /// Compiled pattern keys, in supplied order.
    #[must_use]
    pub fn pattern_keys(&self) -> &[Regex] {
        &self.patterns
    }

    /// Returns true if neither list holds a filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.patterns.is_empty()
    }
}

/// Normalize raw filter inputs into a [`FilterSet`].
///
/// Absent inputs count as empty lists. Pattern text is compiled with default
/// regex semantics; text that does not compile is skipped. Exact keys that
/// any pattern already matches are dropped, as are repeated keys and
/// repeated pattern text. Compiled patterns are always kept, since two
/// regexes with the same text may have been built with different flags.
#[must_use]
pub fn normalize(
    exact_filters: Option<&KeyFilters>,
    pattern_filters: Option<&PatternFilters>,
) -> FilterSet {
    let mut patterns: Vec<Regex> = Vec::new();
    let mut seen_text: Vec<&str> = Vec::new();
    for source in pattern_filters.into_iter().flat_map(|p| p.iter()) {
        if let PatternSource::Text(text) = source {
            if seen_text.contains(&text.as_str()) {
                continue;
            }
            seen_text.push(text);
        }
        match source.compile() {
            Ok(regex) => patterns.push(regex),
            Err(e) => {
                warn!(pattern = %source.as_str(), error = %e, "Skipping invalid key pattern");
            }
        }
    }

    let mut exact: Vec<String> = Vec::new();
    for key in exact_filters.into_iter().flat_map(|k| k.iter()) {
        if exact.iter().any(|k| k == key) {
            continue;
        }
        if patterns.iter().any(|p| p.is_match(key)) {
            trace!(key, "Exact key already covered by a pattern");
            continue;
        }
        exact.push(key.to_string());
    }

    FilterSet { exact, patterns }
}
