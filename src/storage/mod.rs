//! Storage module for persisting the inverted index
//!
//! The index file is a single JSON document:
//!
//! ```json
//! { "Afghanistan": [["http://example.com/view/1", 4]], "Area": [["http://example.com/view/1", 1]] }
//! ```

mod json;
mod traits;

pub use json::JsonIndexStore;
pub use traits::{IndexStore, StorageError, StorageResult};

use crate::index::InvertedIndex;
use std::path::Path;

/// Writes `index` to the JSON file at `path`
pub fn save_index(path: &Path, index: &InvertedIndex) -> StorageResult<()> {
    JsonIndexStore::new(path).save(index)
}

/// Reads the JSON index file at `path`
pub fn load_index(path: &Path) -> StorageResult<InvertedIndex> {
    JsonIndexStore::new(path).load()
}
