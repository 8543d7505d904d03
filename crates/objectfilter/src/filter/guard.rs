//! Early-return checks.
//!
//! The single validation point of a filtering call. Instead of failing on
//! malformed input, the caller hands the source object back unchanged.

use tracing::debug;

use super::spec::{FilterType, KeyFilters, PatternFilters};
use crate::value::Object;

/// Decide whether filtering should be skipped entirely.
///
/// Returns true when the raw filter type is present but not `include` or
/// `exclude`, when the source has no keys, or when neither filter group holds
/// a usable entry.
#[must_use]
pub fn should_short_circuit(
    source: &Object,
    filter_type: Option<&str>,
    exact_filters: Option<&KeyFilters>,
    pattern_filters: Option<&PatternFilters>,
) -> bool {
    if let Some(raw) = filter_type {
        if raw.parse::<FilterType>().is_err() {
            debug!(filter_type = raw, "Unrecognized filter type, passing object through");
            return true;
        }
    }

    if source.is_empty() {
        return true;
    }

    if !has_usable_filters(exact_filters, pattern_filters) {
        debug!("No usable filters, passing object through");
        return true;
    }

    false
}

/// Returns true if either filter group holds at least one entry.
#[must_use]
pub fn has_usable_filters(
    exact_filters: Option<&KeyFilters>,
    pattern_filters: Option<&PatternFilters>,
) -> bool {
    exact_filters.is_some_and(KeyFilters::has_usable)
        || pattern_filters.is_some_and(PatternFilters::has_usable)
}
