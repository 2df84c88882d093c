//! Storage traits and error types
//!
//! This module defines the trait interface for index stores and
//! associated error types.

use crate::index::InvertedIndex;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Index file not found: {}", .0.display())]
    IndexFileNotFound(PathBuf),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for index persistence backends
///
/// An index is written once at the end of a crawl and read back whole; there
/// are no partial updates.
pub trait IndexStore {
    /// Replaces the stored index with `index`
    fn save(&self, index: &InvertedIndex) -> StorageResult<()>;

    /// Reads the whole stored index
    fn load(&self) -> StorageResult<InvertedIndex>;
}
