//! # Unnest - Entry Graph Normalizer
//!
//! Flattens nested, denormalized JSON (API responses with embedded
//! sub-resources) into a flat lookup table keyed by entry ID.
//!
//! ## Modules
//!
//! - **unwrap**: classify, flatten and merge nested entries
//! - **error**: the error raised when an entry lacks its ID or type
//!
//! ## Quick Start
//!
//! ```rust
//! use unnest::unwrap_entry;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let post = json!({
//!     "id": "p1",
//!     "type": "post",
//!     "author": {"id": "u1", "type": "user", "name": "Ann"},
//!     "tags": [{"id": "t1", "type": "tag"}, {"id": "t2", "type": "tag"}]
//! });
//!
//! let entries = unwrap_entry(&post, None)?;
//!
//! assert_eq!(entries.len(), 4);
//! assert_eq!(entries.get("p1").unwrap()["author"], "u1");
//! assert_eq!(entries.get("p1").unwrap()["tags"], json!(["t1", "t2"]));
//! # Ok(())
//! # }
//! ```
//!
//! Field names are configurable:
//!
//! ```rust
//! use unnest::{Unwrapper, UnwrapOptions};
//! use serde_json::json;
//!
//! let options = UnwrapOptions::new().with_id_key("_id").with_type_key("__typename");
//! let unwrapper = Unwrapper::from_options(Some(&options));
//!
//! let err = unwrapper.unwrap_value(&json!({"_id": "a"})).unwrap_err();
//! assert_eq!(err.key(), "__typename");
//! ```

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::BufRead;

pub mod error;
pub mod unwrap;

// Re-export commonly used types for convenience
pub use error::{KeyRole, UnwrapError};
pub use unwrap::{
    unwrap_entry, unwrap_entry_list, EntryId, EntryMap, LineWriter, MapWriter, TypeWriter,
    UnwrapConfig, UnwrapOptions, Unwrapper,
};

/// Unwrap a newline-delimited JSON stream, merging every record into one map
pub fn unwrap_json<R: BufRead>(reader: R, unwrapper: &Unwrapper) -> Result<EntryMap> {
    let mut entries = EntryMap::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse JSON on line {}", line_no + 1))?;

        let record = unwrapper
            .unwrap_value(&value)
            .with_context(|| format!("Failed to unwrap record on line {}", line_no + 1))?;
        entries.merge(record);
    }

    Ok(entries)
}
