//! Value classification for assignment and descent.

use super::spec::FilterType;
use crate::value::{Object, Value};

/// Returns true for values assigned as-is during recursive exclusion:
/// primitives and opaque values, which are never filtered themselves.
#[must_use]
pub fn is_passthrough(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Opaque(_) => {
            true
        }
        Value::Object(_) => false,
    }
}

/// Returns true for plain objects, the only values the filter descends into.
#[must_use]
pub fn is_plain_container(value: &Value) -> bool {
    !is_passthrough(value)
}

/// The value to assign for a kept key.
///
/// Include mode and flat filtering keep the value whole. Recursive exclusion
/// assigns an empty object in place of a plain object; the walk fills it in
/// when it descends there.
#[must_use]
pub fn target_value(value: &Value, filter_type: FilterType, recursive: bool) -> Value {
    if filter_type == FilterType::Include || !recursive || is_passthrough(value) {
        return value.clone();
    }
    Value::Object(Object::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn nested() -> Value {
        Value::from(json!({"prop1": "prop1", "prop2": "prop2"}))
    }

    #[test]
    fn test_primitives_and_opaque_values_pass_through() {
        let values = [
            Value::Null,
            Value::from("string"),
            Value::from(25),
            Value::from(true),
            Value::from(150_u64),
            Value::seq([Value::from(1), Value::from("2"), Value::from(true)]),
            Value::from(Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()),
            Value::set(["a"]),
            Value::dict([("k", "v")]),
            Value::bytes(vec![0u8, 1]),
        ];
        for value in &values {
            assert!(is_passthrough(value), "{value:?}");
            assert!(!is_plain_container(value), "{value:?}");
        }
    }

    #[test]
    fn test_objects_are_plain_containers() {
        assert!(!is_passthrough(&nested()));
        assert!(is_plain_container(&nested()));
        assert!(is_plain_container(&Value::Object(Object::new())));
    }

    #[test]
    fn test_include_always_returns_value() {
        assert_eq!(target_value(&nested(), FilterType::Include, false), nested());
        assert_eq!(target_value(&nested(), FilterType::Include, true), nested());
    }

    #[test]
    fn test_flat_exclude_returns_value() {
        assert_eq!(target_value(&nested(), FilterType::Exclude, false), nested());
    }

    #[test]
    fn test_recursive_exclude_keeps_passthrough_values() {
        let list = Value::seq([1, 2, 3]);
        assert_eq!(target_value(&list, FilterType::Exclude, true), list);
        assert_eq!(
            target_value(&Value::from("x"), FilterType::Exclude, true),
            Value::from("x")
        );
    }

    #[test]
    fn test_recursive_exclude_empties_objects() {
        assert_eq!(
            target_value(&nested(), FilterType::Exclude, true),
            Value::Object(Object::new())
        );
    }

    #[test]
    fn test_opaque_values_are_shared_not_copied() {
        let list = Value::seq([1, 2, 3]);
        let assigned = target_value(&list, FilterType::Exclude, true);
        match (&list, &assigned) {
            (Value::Opaque(a), Value::Opaque(b)) => assert!(std::sync::Arc::ptr_eq(a, b)),
            _ => panic!("Expected opaque values"),
        }
    }
}
