//! Recursive key filtering for nested objects.
//!
//! Filters an [`Object`] by its keys, either keeping only the matching keys
//! (`include`) or dropping them (`exclude`), optionally descending into
//! nested objects. Keys are matched by exact strings and by regex patterns.
//! Opaque values such as sequences, sets and date/times are kept or dropped
//! whole and never looked into.
//!
//! Filtering never fails. An unrecognized filter type, an empty source or
//! the absence of usable filters hands the source back unchanged.
//!
//! # Example
//!
//! ```
//! use objectfilter::{filter_object, FilterSpec, Object};
//! use serde_json::json;
//!
//! let payload = Object::try_from(json!({
//!     "user": "alice",
//!     "password": "hunter2",
//!     "session": {"token": "abc", "expires": 3600},
//! }))
//! .unwrap();
//!
//! let spec = FilterSpec::new().with_regex_filters("(?i)password|token");
//! let redacted = filter_object(&payload, &spec);
//!
//! assert_eq!(
//!     redacted.to_json(),
//!     json!({"user": "alice", "session": {"expires": 3600}})
//! );
//! ```

mod classify;
mod engine;
mod guard;
mod normalize;
mod spec;

use std::borrow::Cow;

use tracing::debug;

use crate::value::Object;

pub use classify::{is_passthrough, is_plain_container, target_value};
pub use engine::{keys_to_keep, recursive_filter, single_level_match, successor_keys};
pub use guard::{has_usable_filters, should_short_circuit};
pub use normalize::{normalize, FilterSet};
pub use spec::{BranchPolicy, FilterSpec, FilterType, KeyFilters, PatternFilters, PatternSource};

/// Default limit on the number of nested levels the filter descends into.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Filter `target` according to `spec`.
///
/// Returns the borrowed `target` when filtering is short-circuited or when
/// no filter matches any key, and a newly built object otherwise. `target`
/// is never modified.
#[must_use]
pub fn filter_object<'a>(target: &'a Object, spec: &FilterSpec) -> Cow<'a, Object> {
    if should_short_circuit(
        target,
        spec.filter_type.as_deref(),
        spec.filters.as_ref(),
        spec.regex_filters.as_ref(),
    ) {
        return Cow::Borrowed(target);
    }
    let Some(filter) = ObjectFilter::from_spec(spec) else {
        return Cow::Borrowed(target);
    };
    filter.apply(target)
}

/// A compiled, reusable filter.
///
/// Normalizes and compiles the filters once, then applies them to any
/// number of objects.
///
/// ```
/// use objectfilter::{FilterSpec, FilterType, Object, ObjectFilter};
/// use serde_json::json;
///
/// let filter = ObjectFilter::from_spec(
///     &FilterSpec::new()
///         .with_filters(["id", "name"])
///         .with_filter_type(FilterType::Include),
/// )
/// .unwrap();
///
/// let record = Object::try_from(json!({"id": 7, "name": "x", "internal": true})).unwrap();
/// assert_eq!(filter.apply(&record).to_json(), json!({"id": 7, "name": "x"}));
/// ```
#[derive(Debug, Clone)]
pub struct ObjectFilter {
    filter_set: FilterSet,
    filter_type: FilterType,
    recursive: bool,
    max_depth: usize,
    unmatched_branches: BranchPolicy,
}

impl ObjectFilter {
    /// Compile a filter from a specification.
    ///
    /// Returns `None` when the specification would only ever pass objects
    /// through: an unrecognized filter type, or no usable filters.
    #[must_use]
    pub fn from_spec(spec: &FilterSpec) -> Option<Self> {
        let filter_type = match spec.filter_type.as_deref() {
            None => FilterType::default(),
            Some(raw) => raw.parse().ok()?,
        };
        if !has_usable_filters(spec.filters.as_ref(), spec.regex_filters.as_ref()) {
            return None;
        }

        Some(Self {
            filter_set: normalize(spec.filters.as_ref(), spec.regex_filters.as_ref()),
            filter_type,
            recursive: spec.recursive.unwrap_or(true),
            max_depth: spec.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            unmatched_branches: spec.unmatched_branches.unwrap_or_default(),
        })
    }

    /// The normalized filters.
    #[must_use]
    pub fn filter_set(&self) -> &FilterSet {
        &self.filter_set
    }

    /// The filter type.
    #[must_use]
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Whether nested objects are filtered too.
    #[must_use]
    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Apply the filter.
    ///
    /// `target` is returned borrowed when it is empty or when no filter
    /// matches any of its keys at any depth; anything else yields a newly
    /// built object.
    #[must_use]
    pub fn apply<'a>(&self, target: &'a Object) -> Cow<'a, Object> {
        if target.is_empty() {
            return Cow::Borrowed(target);
        }
        debug!(
            filter_type = %self.filter_type,
            exact = self.filter_set.exact_keys().len(),
            patterns = self.filter_set.pattern_keys().len(),
            recursive = self.recursive,
            "Filtering object"
        );
        let walk = engine::Walk {
            filters: &self.filter_set,
            filter_type: self.filter_type,
            recursive: self.recursive,
            max_depth: self.max_depth,
            unmatched_branches: self.unmatched_branches,
        };
        match walk.run(target) {
            Some(filtered) => Cow::Owned(filtered),
            None => {
                debug!("No filter matched, passing object through");
                Cow::Borrowed(target)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use regex::Regex;
    use serde_json::json;

    fn target() -> Object {
        ["one", "two", "three", "four"]
            .into_iter()
            .map(|key| (key, key))
            .collect()
    }

    fn keys(object: &Object) -> Vec<&str> {
        object.keys().collect()
    }

    #[test]
    fn test_include_keeps_filter_keys_only() {
        let spec = FilterSpec::new()
            .with_filters(["one", "two"])
            .with_filter_type(FilterType::Include);
        let target = target();
        let filtered = filter_object(&target, &spec);
        assert_eq!(keys(&filtered), vec!["one", "two"]);
    }

    #[test]
    fn test_exclude_drops_filter_keys() {
        let spec = FilterSpec::new()
            .with_filters(["one"])
            .with_filter_type(FilterType::Exclude);
        let target = target();
        let filtered = filter_object(&target, &spec);
        assert_eq!(keys(&filtered), vec!["two", "three", "four"]);
    }

    #[test]
    fn test_defaults_to_exclude() {
        let target = target();
        let filtered = filter_object(&target, &FilterSpec::new().with_filters("one"));
        assert_eq!(filtered.len(), 3);
        assert!(!filtered.contains_key("one"));
    }

    #[test]
    fn test_defaults_to_recursive() {
        let filter = ObjectFilter::from_spec(&FilterSpec::new().with_filters("one")).unwrap();
        assert!(filter.is_recursive());

        let filter = ObjectFilter::from_spec(
            &FilterSpec::new().with_filters("one").with_recursive(false),
        )
        .unwrap();
        assert!(!filter.is_recursive());
    }

    #[test]
    fn test_invalid_filter_type_returns_original() {
        let spec = FilterSpec {
            filter_type: Some("invalidType".to_string()),
            ..FilterSpec::new().with_filters("one")
        };
        let target = target();
        let filtered = filter_object(&target, &spec);
        assert!(matches!(filtered, Cow::Borrowed(_)));
        assert_eq!(*filtered, target);
        assert!(ObjectFilter::from_spec(&spec).is_none());
    }

    #[test]
    fn test_no_filters_returns_original() {
        let target = target();
        let filtered = filter_object(&target, &FilterSpec::new());
        assert!(matches!(filtered, Cow::Borrowed(_)));
        assert!(ObjectFilter::from_spec(&FilterSpec::new()).is_none());
    }

    #[test]
    fn test_empty_target_returns_original() {
        let empty = Object::new();
        let filtered = filter_object(&empty, &FilterSpec::new().with_filters("one"));
        assert!(matches!(filtered, Cow::Borrowed(_)));

        let filter = ObjectFilter::from_spec(&FilterSpec::new().with_filters("one")).unwrap();
        assert!(matches!(filter.apply(&empty), Cow::Borrowed(_)));
    }

    #[test]
    fn test_both_filter_groups_are_applied() {
        let target = Object::try_from(json!({
            "one": "one",
            "tWo": "tWo",
            "anotherProperty": "anotherProperty",
        }))
        .unwrap();
        let spec = FilterSpec::new()
            .with_filters("one")
            .with_regex_filters(Regex::new("(?i)two").unwrap());

        let excluded = filter_object(&target, &spec.clone().with_filter_type(FilterType::Exclude));
        assert_eq!(keys(&excluded), vec!["anotherProperty"]);

        let included = filter_object(&target, &spec.with_filter_type(FilterType::Include));
        assert_eq!(keys(&included), vec!["one", "tWo"]);
    }

    #[test]
    fn test_unmatched_filters_do_not_influence_result() {
        let target = Object::try_from(json!({"one": "one", "tWo": "tWo", "other": "other"})).unwrap();
        let spec = FilterSpec::new()
            .with_filters(["one", "invalidFilter"])
            .with_regex_filters(vec![
                PatternSource::from(Regex::new("(?i)two").unwrap()),
                PatternSource::from("invalidRegex"),
            ]);
        let filtered = filter_object(&target, &spec);
        assert_eq!(keys(&filtered), vec!["other"]);
    }

    #[test]
    fn test_filters_matching_nothing_return_original_in_both_modes() {
        let target = Object::try_from(json!({"one": 1, "two": {"three": 3}})).unwrap();
        for filter_type in [FilterType::Include, FilterType::Exclude] {
            for recursive in [true, false] {
                let spec = FilterSpec::new()
                    .with_filters("zzz")
                    .with_filter_type(filter_type)
                    .with_recursive(recursive);
                let filtered = filter_object(&target, &spec);
                assert!(
                    matches!(filtered, Cow::Borrowed(_)),
                    "{filter_type} recursive={recursive}"
                );
                assert_eq!(*filtered, target);
            }
        }
    }

    #[test]
    fn test_filter_is_reusable() {
        let filter = ObjectFilter::from_spec(&FilterSpec::new().with_regex_filters("^secret")).unwrap();
        assert_eq!(filter.filter_type(), FilterType::Exclude);
        assert_eq!(filter.filter_set().pattern_keys().len(), 1);

        for n in 0..3 {
            let record: Object = [("id", Value::from(n)), ("secret_key", Value::from("x"))]
                .into_iter()
                .collect();
            let filtered = filter.apply(&record);
            assert_eq!(keys(&filtered), vec!["id"]);
        }
    }

    #[test]
    fn test_object_filter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ObjectFilter>();
    }

    #[test]
    fn test_target_is_not_modified() {
        let target = Object::try_from(json!({"a": {"secret": 1, "b": 2}, "secret": 3})).unwrap();
        let before = target.clone();
        let filtered = filter_object(&target, &FilterSpec::new().with_filters("secret"));
        assert_eq!(filtered.to_json(), json!({"a": {"b": 2}}));
        assert_eq!(target, before);
    }
}
