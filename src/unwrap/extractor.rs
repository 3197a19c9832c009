use crate::error::{KeyRole, Result, UnwrapError};
use crate::unwrap::classify::{is_entry, is_list_of_entries, is_missing};
use crate::unwrap::types::{EntryId, EntryMap, UnwrapConfig, UnwrapOptions};
use serde_json::{Map, Value};

/// The core unwrapper that flattens nested entries into an [`EntryMap`]
#[derive(Debug, Clone, Default)]
pub struct Unwrapper {
    config: UnwrapConfig,
}

impl Unwrapper {
    pub fn new(config: UnwrapConfig) -> Self {
        Unwrapper { config }
    }

    /// Build an unwrapper from optional caller options, applying defaults
    pub fn from_options(options: Option<&UnwrapOptions>) -> Self {
        Self::new(UnwrapOptions::resolve(options))
    }

    pub fn config(&self) -> &UnwrapConfig {
        &self.config
    }

    /// Unwrap a root value. Anything other than an object has no ID.
    pub fn unwrap_value(&self, value: &Value) -> Result<EntryMap> {
        match value {
            Value::Object(obj) => self.unwrap_entry(obj),
            _ => Err(UnwrapError::missing(&self.config.id_key, KeyRole::Id)),
        }
    }

    /// Flatten one entry and everything nested inside it.
    ///
    /// The input is left untouched; the returned map holds a copy of it
    /// with nested entries replaced by their IDs.
    pub fn unwrap_entry(&self, entry: &Map<String, Value>) -> Result<EntryMap> {
        self.unwrap_owned(entry.clone())
    }

    /// Flatten every element of a list and merge the results in order.
    ///
    /// Stops at the first element that fails.
    pub fn unwrap_entry_list(&self, entries: &[Value]) -> Result<EntryMap> {
        self.unwrap_list_owned(entries.to_vec())
    }

    /// Validate the required keys and return the entry's map key
    fn entry_id(&self, entry: &Map<String, Value>) -> Result<EntryId> {
        let Some(id) = entry
            .get(&self.config.id_key)
            .filter(|id| !is_missing(Some(*id)))
        else {
            return Err(UnwrapError::missing(&self.config.id_key, KeyRole::Id));
        };
        if is_missing(entry.get(&self.config.type_key)) {
            return Err(UnwrapError::missing(&self.config.type_key, KeyRole::Type));
        }

        Ok(EntryId::from_value(id))
    }

    /// Read the raw ID value that replaces a nested entry in its parent
    fn reference(&self, entry: &Map<String, Value>) -> Value {
        entry.get(&self.config.id_key).cloned().unwrap_or(Value::Null)
    }

    fn unwrap_owned(&self, mut main_entry: Map<String, Value>) -> Result<EntryMap> {
        let id = self.entry_id(&main_entry)?;
        let mut entries = EntryMap::new();

        for (field_name, field) in main_entry.iter_mut() {
            if is_entry(field, &self.config) {
                let Value::Object(nested) = std::mem::take(field) else {
                    continue;
                };
                tracing::trace!(field = %field_name, "unwrapping nested entry");

                let reference = self.reference(&nested);
                entries.merge(self.unwrap_owned(nested)?);
                *field = reference;
            } else if is_list_of_entries(field, &self.config) {
                let Value::Array(items) = std::mem::take(field) else {
                    continue;
                };
                tracing::trace!(field = %field_name, len = items.len(), "unwrapping entry list");

                let references = items
                    .iter()
                    .map(|item| item.as_object().map(|obj| self.reference(obj)).unwrap_or(Value::Null))
                    .collect();
                entries.merge(self.unwrap_list_owned(items)?);
                *field = Value::Array(references);
            }
        }

        tracing::debug!(id = %id, nested = entries.len(), "unwrapped entry");

        // The entry's own data replaces any nested sighting of the same ID
        entries.insert(id, main_entry);
        Ok(entries)
    }

    fn unwrap_list_owned(&self, items: Vec<Value>) -> Result<EntryMap> {
        let mut entries = EntryMap::new();

        for item in items {
            let Value::Object(obj) = item else {
                return Err(UnwrapError::missing(&self.config.id_key, KeyRole::Id));
            };
            entries.merge(self.unwrap_owned(obj)?);
        }

        Ok(entries)
    }
}

/// Flatten a root value using the given options (defaults when `None`)
pub fn unwrap_entry(value: &Value, options: Option<&UnwrapOptions>) -> Result<EntryMap> {
    Unwrapper::from_options(options).unwrap_value(value)
}

/// Flatten a list of root values and merge them into one map
pub fn unwrap_entry_list(values: &[Value], options: Option<&UnwrapOptions>) -> Result<EntryMap> {
    Unwrapper::from_options(options).unwrap_entry_list(values)
}
