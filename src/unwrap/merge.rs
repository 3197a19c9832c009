//! Deep structural merge of JSON values
//!
//! Objects merge key by key, recursively. Anything else that collides
//! (scalars, `null`, arrays) is replaced by the incoming value; arrays are
//! never merged element-wise.

use serde_json::{Map, Value};

/// Merge `source` into `target`, `source` winning on conflicting leaves
pub fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => merge_objects(target, source),
        (target, source) => *target = source,
    }
}

/// Merge the fields of `source` into `target`
pub fn merge_objects(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        match target.get_mut(&key) {
            Some(existing) => merge_values(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
}
