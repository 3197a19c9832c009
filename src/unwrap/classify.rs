//! Routing predicates deciding which fields get unwrapped
//!
//! These are presence tests only. The strict check that raises an error
//! lives in the unwrapper and runs when an object is actually flattened.

use crate::unwrap::types::UnwrapConfig;
use serde_json::{Map, Value};

/// Whether a key's value counts as missing.
///
/// Absent, `null`, `""`, `false` and numeric zero are all missing.
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(true)) | Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

/// Whether an object carries both an ID and a type
pub fn has_required_keys(obj: &Map<String, Value>, config: &UnwrapConfig) -> bool {
    !is_missing(obj.get(&config.id_key)) && !is_missing(obj.get(&config.type_key))
}

/// Check if a value should be unwrapped as a nested entry
pub fn is_entry(value: &Value, config: &UnwrapConfig) -> bool {
    match value {
        Value::Object(obj) => has_required_keys(obj, config),
        _ => false,
    }
}

/// Check if a value is a non-empty array made up solely of entries
pub fn is_list_of_entries(value: &Value, config: &UnwrapConfig) -> bool {
    match value {
        Value::Array(arr) if !arr.is_empty() => arr.iter().all(|v| is_entry(v, config)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_values() {
        assert!(is_missing(None));
        assert!(is_missing(Some(&json!(null))));
        assert!(is_missing(Some(&json!(""))));
        assert!(is_missing(Some(&json!(false))));
        assert!(is_missing(Some(&json!(0))));
        assert!(is_missing(Some(&json!(0.0))));

        assert!(!is_missing(Some(&json!("0"))));
        assert!(!is_missing(Some(&json!(7))));
        assert!(!is_missing(Some(&json!(-1))));
        assert!(!is_missing(Some(&json!(true))));
        assert!(!is_missing(Some(&json!([]))));
        assert!(!is_missing(Some(&json!({}))));
    }

    #[test]
    fn test_is_entry() {
        let config = UnwrapConfig::default();

        assert!(is_entry(&json!({"id": "u1", "type": "user"}), &config));
        assert!(is_entry(&json!({"id": 3, "type": "user", "name": "Ann"}), &config));

        assert!(!is_entry(&json!({"id": "u1"}), &config));
        assert!(!is_entry(&json!({"type": "user"}), &config));
        assert!(!is_entry(&json!({"id": "", "type": "user"}), &config));
        assert!(!is_entry(&json!({"id": 0, "type": "user"}), &config));
        assert!(!is_entry(&json!("u1"), &config));
        assert!(!is_entry(&json!(null), &config));
        assert!(!is_entry(&json!([{"id": "u1", "type": "user"}]), &config));
    }

    #[test]
    fn test_is_entry_custom_keys() {
        let config = UnwrapConfig {
            id_key: "_id".to_string(),
            type_key: "__typename".to_string(),
        };

        assert!(is_entry(&json!({"_id": "a", "__typename": "Post"}), &config));
        assert!(!is_entry(&json!({"id": "a", "type": "post"}), &config));
    }

    #[test]
    fn test_is_list_of_entries() {
        let config = UnwrapConfig::default();

        assert!(is_list_of_entries(
            &json!([{"id": "t1", "type": "tag"}, {"id": "t2", "type": "tag"}]),
            &config
        ));

        // One plain element disqualifies the whole list
        assert!(!is_list_of_entries(
            &json!([{"id": "t1", "type": "tag"}, {"label": "x"}]),
            &config
        ));
        assert!(!is_list_of_entries(&json!([{"id": "t1", "type": "tag"}, "t2"]), &config));
        assert!(!is_list_of_entries(&json!(["t1", "t2"]), &config));
        assert!(!is_list_of_entries(&json!([]), &config));
        assert!(!is_list_of_entries(&json!({"id": "t1", "type": "tag"}), &config));
    }
}
