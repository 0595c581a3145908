//! Storage traits and error types
//!
//! This module defines the trait interface for record stores and the
//! associated error types.

use crate::record::NormalizedRow;
use crate::storage::BusinessKnowledge;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unexpected CSV header: {0}")]
    Header(String),
}

impl StorageError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for record store implementations
///
/// A store owns one location. Every save replaces the whole row set there.
pub trait RecordStore {
    /// Replaces the stored rows, returning how many were written
    fn save(&self, rows: &[NormalizedRow]) -> StorageResult<usize>;

    /// Reads every stored row back, in storage order
    fn load_rows(&self) -> StorageResult<Vec<NormalizedRow>>;

    /// Builds the knowledge view over the stored rows
    fn load(&self) -> StorageResult<BusinessKnowledge> {
        Ok(BusinessKnowledge::from_rows(&self.load_rows()?))
    }
}
