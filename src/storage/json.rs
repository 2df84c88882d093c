use crate::index::InvertedIndex;
use crate::storage::traits::{IndexStore, StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Stores the index as a single JSON document
///
/// The document maps each term to an array of `[page, frequency]` pairs. It is
/// written to a sibling temporary file first and renamed into place, so an
/// interrupted save never leaves a truncated index behind.
#[derive(Debug, Clone)]
pub struct JsonIndexStore {
    path: PathBuf,
}

impl JsonIndexStore {
    /// Creates a store for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the index file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl IndexStore for JsonIndexStore {
    fn save(&self, index: &InvertedIndex) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            serde_json::to_writer(&mut writer, index)?;
            writer.flush()?;
        }
        fs::rename(&temp_path, &self.path)?;

        tracing::info!(
            "Saved index with {} terms to {}",
            index.term_count(),
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> StorageResult<InvertedIndex> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::IndexFileNotFound(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };

        let index: InvertedIndex = serde_json::from_reader(BufReader::new(file))?;
        tracing::info!(
            "Loaded index with {} terms from {}",
            index.term_count(),
            self.path.display()
        );
        Ok(index)
    }
}
