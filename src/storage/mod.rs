//! Match persistence.
//!
//! The data directory holds:
//! - `matches.jsonl`, one match per line
//! - `backups/`, timestamped JSON snapshots
//! - `name-mapping.json`, the last player-name consolidation proposal

mod jsonl;
mod store;

pub use jsonl::{JsonlReader, JsonlWriter};
pub use store::{JsonlMatchStore, MatchStore, MemoryMatchStore, StoreError};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path:?} line {line}: {source}")]
    InvalidRecord {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join("matches.jsonl")
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    pub fn name_mapping_path(&self) -> PathBuf {
        self.data_dir.join("name-mapping.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
