//! Recursive filter engine.
//!
//! Walks the source object depth-first. Each level matches its keys against
//! the filter set, assigns the kept keys into a fresh output object, then
//! descends into the selected nested objects. The output for a nested level
//! is returned to its parent, which places it under the key it descended
//! through, so output is assembled in lockstep with the walk.

use std::collections::HashSet;

use tracing::{trace, warn};

use super::classify::{is_plain_container, target_value};
use super::normalize::FilterSet;
use super::spec::{BranchPolicy, FilterType};
use super::DEFAULT_MAX_DEPTH;
use crate::value::{Object, Value};

/// Match one level's keys against the filters.
///
/// Patterns are tried first, in order, each claiming every key it matches
/// that no earlier filter claimed; exact keys are tried next over whatever
/// remains. The result follows `source_keys` order.
#[must_use]
pub fn single_level_match<'k>(source_keys: &[&'k str], filters: &FilterSet) -> Vec<&'k str> {
    let mut claimed = vec![false; source_keys.len()];
    let mut remaining = source_keys.len();

    for pattern in filters.pattern_keys() {
        if remaining == 0 {
            break;
        }
        for (index, key) in source_keys.iter().enumerate() {
            if !claimed[index] && pattern.is_match(key) {
                claimed[index] = true;
                remaining -= 1;
            }
        }
    }

    for exact in filters.exact_keys() {
        if remaining == 0 {
            break;
        }
        if let Some(index) = source_keys.iter().position(|key| *key == exact.as_str()) {
            if !claimed[index] {
                claimed[index] = true;
                remaining -= 1;
            }
        }
    }

    source_keys
        .iter()
        .zip(&claimed)
        .filter_map(|(key, claimed)| claimed.then_some(*key))
        .collect()
}

/// Resolve which keys the output keeps for the given mode.
#[must_use]
pub fn keys_to_keep<'k>(
    source_keys: &[&'k str],
    matched_keys: &[&str],
    filter_type: FilterType,
) -> Vec<&'k str> {
    let keep_matched = filter_type == FilterType::Include;
    let matched: HashSet<&str> = matched_keys.iter().copied().collect();
    source_keys
        .iter()
        .copied()
        .filter(|key| matched.contains(key) == keep_matched)
        .collect()
}

/// Select the keys to descend into.
///
/// Include mode descends into every nested object so that partial matches
/// further down are found. Exclude mode skips matched keys, since their
/// whole subtree is already gone.
#[must_use]
pub fn successor_keys<'s>(
    source: &'s Object,
    matched_keys: &[&str],
    filter_type: FilterType,
) -> Vec<&'s str> {
    let matched: HashSet<&str> = matched_keys.iter().copied().collect();
    source
        .iter()
        .filter(|(key, value)| {
            is_plain_container(value)
                && (filter_type == FilterType::Include || !matched.contains(key))
        })
        .map(|(key, _)| key)
        .collect()
}

/// Filter `source` with default depth and branch settings.
///
/// When no filter matches any key at any level, the result equals `source`.
#[must_use]
pub fn recursive_filter(
    source: &Object,
    filters: &FilterSet,
    filter_type: FilterType,
    recursive: bool,
) -> Object {
    Walk {
        filters,
        filter_type,
        recursive,
        max_depth: DEFAULT_MAX_DEPTH,
        unmatched_branches: BranchPolicy::default(),
    }
    .run(source)
    .unwrap_or_else(|| source.clone())
}

/// One filtering pass over a source object.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Walk<'f> {
    pub(crate) filters: &'f FilterSet,
    pub(crate) filter_type: FilterType,
    pub(crate) recursive: bool,
    pub(crate) max_depth: usize,
    pub(crate) unmatched_branches: BranchPolicy,
}

/// What a walk ran into beyond the output it built.
#[derive(Debug, Default)]
struct Outcome {
    matched: bool,
    truncated: bool,
}

impl Walk<'_> {
    /// Run the walk. Returns `None` when no filter matched anywhere, in
    /// which case the source is already its own result.
    ///
    /// A walk cut short by the depth limit always yields its output, since
    /// whatever lies past the limit was never checked.
    pub(crate) fn run(&self, source: &Object) -> Option<Object> {
        let mut path = Vec::new();
        let mut outcome = Outcome::default();
        let output = self.level(source, None, &mut path, &mut outcome);
        if !outcome.matched && !outcome.truncated {
            return None;
        }
        Some(output.unwrap_or_default())
    }

    /// Filter one level.
    ///
    /// `slot` is whatever the parent already assigned at this location. It is
    /// replaced when this level keeps any key and carried through otherwise.
    /// `None` comes back only when nothing was assigned here or below.
    fn level<'s>(
        &self,
        source: &'s Object,
        slot: Option<Object>,
        path: &mut Vec<&'s str>,
        outcome: &mut Outcome,
    ) -> Option<Object> {
        let source_keys: Vec<&str> = source.keys().collect();
        let matched = single_level_match(&source_keys, self.filters);
        outcome.matched |= !matched.is_empty();
        let keep = keys_to_keep(&source_keys, &matched, self.filter_type);
        trace!(
            path = %path.join("."),
            matched = matched.len(),
            kept = keep.len(),
            "Filtered level"
        );

        let mut output = if keep.is_empty() {
            slot
        } else {
            let mut fresh = Object::with_capacity(keep.len());
            for key in keep {
                if let Some(value) = source.get(key) {
                    fresh.insert(key, target_value(value, self.filter_type, self.recursive));
                }
            }
            Some(fresh)
        };

        if !self.recursive {
            return output;
        }

        let successors = successor_keys(source, &matched, self.filter_type);
        if successors.is_empty() {
            return output;
        }
        if path.len() >= self.max_depth {
            warn!(
                path = %path.join("."),
                max_depth = self.max_depth,
                skipped = successors.len(),
                "Maximum filter depth reached, not descending further"
            );
            outcome.truncated = true;
            return output;
        }

        let mut appended = false;
        for key in successors {
            let Some(Value::Object(child)) = source.get(key) else {
                continue;
            };
            let child_slot = output.as_mut().and_then(|o| o.take_object(key));

            path.push(key);
            let produced = self.level(child, child_slot, path, outcome);
            path.pop();

            let produced = match produced {
                Some(object) => object,
                None if self.keeps_empty_branches() => Object::new(),
                None => continue,
            };
            appended |= output
                .get_or_insert_with(Object::new)
                .insert(key, produced)
                .is_none();
        }

        if appended {
            if let Some(object) = output.as_mut() {
                object.sort_like(source);
            }
        }
        output
    }

    fn keeps_empty_branches(&self) -> bool {
        self.filter_type == FilterType::Include
            && self.unmatched_branches == BranchPolicy::KeepEmpty
    }
}
