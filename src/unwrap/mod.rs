//! Entry unwrapping - flatten nested entries into an ID-keyed map
//!
//! An entry is any JSON object carrying both an ID field and a type field.
//! Unwrapping lifts every nested entry (or list of entries) into a flat
//! [`EntryMap`] and leaves its ID behind in the parent.

pub mod types;
pub mod classify;
pub mod merge;
pub mod extractor;
pub mod writer;

pub use types::{EntryId, EntryMap, UnwrapConfig, UnwrapOptions};
pub use classify::{is_entry, is_list_of_entries};
pub use extractor::{unwrap_entry, unwrap_entry_list, Unwrapper};
pub use writer::{LineWriter, MapWriter, TypeWriter};
