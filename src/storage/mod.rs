//! Storage module for persisting extracted rows
//!
//! This module handles writing a run's rows to durable storage and reading
//! them back, including:
//! - CSV persistence with whole-file replacement
//! - The grouped knowledge view the responder answers from

mod csv_store;
mod knowledge;
mod traits;

pub use csv_store::CsvStore;
pub use knowledge::{BusinessKnowledge, LinkEntry, ServiceOffer};
pub use traits::{RecordStore, StorageError, StorageResult};

use std::path::Path;

/// Opens the CSV store at `path`
pub fn open_store(path: &Path) -> CsvStore {
    CsvStore::new(path)
}

/// Loads the knowledge view stored at `path`
pub fn load_knowledge(path: &Path) -> StorageResult<BusinessKnowledge> {
    open_store(path).load()
}
