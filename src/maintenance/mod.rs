//! Offline maintenance of the match collection: backups, player-name
//! consolidation and validation of hand-written match files.
//!
//! None of this runs inside the server.

mod backup;
mod names;
mod validate;

pub use backup::*;
pub use names::*;
pub use validate::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::storage::{StorageError, StoreError};

#[derive(Debug, Error)]
pub enum MaintenanceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no backups found in {0}")]
    NoBackups(PathBuf),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
