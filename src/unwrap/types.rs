use crate::unwrap::merge::merge_values;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Key under which an entry is stored in an [`EntryMap`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        EntryId(id.into())
    }

    /// Derive the map key from a raw ID value.
    ///
    /// Strings are used verbatim, every other value by its JSON text,
    /// so `7` and `"7"` land on the same key.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => EntryId(s.clone()),
            other => EntryId(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller-facing unwrap options; unset fields fall back to defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnwrapOptions {
    #[serde(default, alias = "idKey", skip_serializing_if = "Option::is_none")]
    pub id_key: Option<String>,

    #[serde(default, alias = "typeKey", skip_serializing_if = "Option::is_none")]
    pub type_key: Option<String>,
}

impl UnwrapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_key(mut self, key: impl Into<String>) -> Self {
        self.id_key = Some(key.into());
        self
    }

    pub fn with_type_key(mut self, key: impl Into<String>) -> Self {
        self.type_key = Some(key.into());
        self
    }

    /// Overlay `other` on top of `self`, keeping our values where `other` is unset
    pub fn layer(self, other: UnwrapOptions) -> Self {
        UnwrapOptions {
            id_key: other.id_key.or(self.id_key),
            type_key: other.type_key.or(self.type_key),
        }
    }

    /// Produce the effective field names
    pub fn resolve(options: Option<&UnwrapOptions>) -> UnwrapConfig {
        let defaults = UnwrapConfig::default();
        let Some(options) = options else {
            return defaults;
        };

        UnwrapConfig {
            id_key: options.id_key.clone().unwrap_or(defaults.id_key),
            type_key: options.type_key.clone().unwrap_or(defaults.type_key),
        }
    }
}

/// Resolved configuration threaded through every recursive step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnwrapConfig {
    /// Field holding an entry's identifier
    pub id_key: String,

    /// Field holding an entry's type discriminator
    pub type_key: String,
}

impl Default for UnwrapConfig {
    fn default() -> Self {
        UnwrapConfig {
            id_key: String::from("id"),
            type_key: String::from("type"),
        }
    }
}

impl From<&UnwrapOptions> for UnwrapConfig {
    fn from(options: &UnwrapOptions) -> Self {
        UnwrapOptions::resolve(Some(options))
    }
}

/// Flat lookup table from entry ID to entry, nested entries replaced by IDs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EntryMap {
    entries: Map<String, Value>,
}

impl EntryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Map<String, Value>> {
        self.entries.get(id).and_then(Value::as_object)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Map<String, Value>)> {
        self.entries
            .iter()
            .filter_map(|(id, entry)| entry.as_object().map(|obj| (id.as_str(), obj)))
    }

    /// Store an entry, replacing whatever was under its ID
    pub fn insert(&mut self, id: EntryId, entry: Map<String, Value>) -> Option<Value> {
        self.entries.insert(id.0, Value::Object(entry))
    }

    /// Deep-merge `other` into this map; `other` wins on conflicting leaves
    pub fn merge(&mut self, other: EntryMap) {
        for (id, entry) in other.entries {
            match self.entries.get_mut(&id) {
                Some(existing) => {
                    tracing::trace!(id = %id, "merging repeated entry");
                    merge_values(existing, entry);
                }
                None => {
                    self.entries.insert(id, entry);
                }
            }
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_defaults() {
        let config = UnwrapOptions::resolve(None);
        assert_eq!(config.id_key, "id");
        assert_eq!(config.type_key, "type");

        let config = UnwrapOptions::resolve(Some(&UnwrapOptions::new()));
        assert_eq!(config, UnwrapConfig::default());
    }

    #[test]
    fn test_resolve_partial_override() {
        let options = UnwrapOptions::new().with_type_key("kind");
        let config = UnwrapOptions::resolve(Some(&options));
        assert_eq!(config.id_key, "id");
        assert_eq!(config.type_key, "kind");
    }

    #[test]
    fn test_options_from_camel_case_json() {
        let options: UnwrapOptions =
            serde_json::from_value(json!({"idKey": "_id", "typeKey": "__typename"})).unwrap();
        let config = UnwrapConfig::from(&options);
        assert_eq!(config.id_key, "_id");
        assert_eq!(config.type_key, "__typename");
    }

    #[test]
    fn test_layer_prefers_later_values() {
        let file = UnwrapOptions::new().with_id_key("uuid").with_type_key("kind");
        let flags = UnwrapOptions::new().with_type_key("class");
        let merged = file.layer(flags);
        assert_eq!(merged.id_key.as_deref(), Some("uuid"));
        assert_eq!(merged.type_key.as_deref(), Some("class"));
    }

    #[test]
    fn test_entry_id_from_value() {
        assert_eq!(EntryId::from_value(&json!("u1")).as_str(), "u1");
        assert_eq!(EntryId::from_value(&json!(42)).as_str(), "42");
        assert_eq!(EntryId::from_value(&json!(true)).as_str(), "true");
    }

    #[test]
    fn test_merge_deep_unions_same_id() {
        let mut left = EntryMap::new();
        left.insert(
            EntryId::new("u1"),
            json!({"id": "u1", "type": "user", "name": "Ann"})
                .as_object()
                .unwrap()
                .clone(),
        );

        let mut right = EntryMap::new();
        right.insert(
            EntryId::new("u1"),
            json!({"id": "u1", "type": "user", "email": "ann@example.com"})
                .as_object()
                .unwrap()
                .clone(),
        );
        right.insert(
            EntryId::new("u2"),
            json!({"id": "u2", "type": "user"}).as_object().unwrap().clone(),
        );

        left.merge(right);

        assert_eq!(left.len(), 2);
        let ann = left.get("u1").unwrap();
        assert_eq!(ann.get("name").unwrap(), "Ann");
        assert_eq!(ann.get("email").unwrap(), "ann@example.com");
        assert!(left.contains("u2"));
    }

    #[test]
    fn test_insert_overwrites() {
        let mut map = EntryMap::new();
        map.insert(
            EntryId::new("p1"),
            json!({"id": "p1", "type": "post", "title": "old"})
                .as_object()
                .unwrap()
                .clone(),
        );
        map.insert(
            EntryId::new("p1"),
            json!({"id": "p1", "type": "post"}).as_object().unwrap().clone(),
        );

        assert!(map.get("p1").unwrap().get("title").is_none());
        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            json!({"p1": {"id": "p1", "type": "post"}})
        );
    }
}
