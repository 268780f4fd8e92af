//! The match record store.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::{JsonlReader, JsonlWriter, StorageError};
use crate::models::{Match, MatchId, MatchInput, ValidationError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("match not found: {0}")]
    NotFound(MatchId),

    #[error("invalid match: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A collection of match records.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Every match, newest `createdAt` first.
    async fn find_all(&self) -> Result<Vec<Match>, StoreError>;

    async fn find(&self, id: &MatchId) -> Result<Match, StoreError>;

    /// Validate and insert; the store assigns the id and both timestamps.
    async fn create(&self, input: MatchInput) -> Result<Match, StoreError>;

    /// Full replacement of an existing match. `createdAt` is preserved.
    async fn update(&self, id: &MatchId, input: MatchInput) -> Result<Match, StoreError>;

    /// Remove a match, returning what was removed.
    async fn delete(&self, id: &MatchId) -> Result<Match, StoreError>;

    /// Replace the whole collection, keeping ids and timestamps as given.
    async fn replace_all(&self, matches: Vec<Match>) -> Result<usize, StoreError>;
}

fn newest_first(matches: &[Match]) -> Vec<Match> {
    let mut sorted = matches.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

fn lookup(matches: &[Match], id: &MatchId) -> Result<Match, StoreError> {
    matches
        .iter()
        .find(|m| &m.id == id)
        .cloned()
        .ok_or_else(|| StoreError::NotFound(id.clone()))
}

fn insert(matches: &mut Vec<Match>, input: MatchInput) -> Result<Match, StoreError> {
    let input = input.normalized();
    input.validate()?;

    let created = Match::from_input(MatchId::generate(), input, Utc::now());
    matches.push(created.clone());
    Ok(created)
}

fn replace(matches: &mut [Match], id: &MatchId, input: MatchInput) -> Result<Match, StoreError> {
    let input = input.normalized();
    input.validate()?;

    let existing = matches
        .iter_mut()
        .find(|m| &m.id == id)
        .ok_or_else(|| StoreError::NotFound(id.clone()))?;
    existing.replace_with(input, Utc::now());
    Ok(existing.clone())
}

fn remove(matches: &mut Vec<Match>, id: &MatchId) -> Result<Match, StoreError> {
    let idx = matches
        .iter()
        .position(|m| &m.id == id)
        .ok_or_else(|| StoreError::NotFound(id.clone()))?;
    Ok(matches.remove(idx))
}

/// In-process store, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryMatchStore {
    matches: RwLock<Vec<Match>>,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchStore for MemoryMatchStore {
    async fn find_all(&self) -> Result<Vec<Match>, StoreError> {
        Ok(newest_first(&self.matches.read().await))
    }

    async fn find(&self, id: &MatchId) -> Result<Match, StoreError> {
        lookup(&self.matches.read().await, id)
    }

    async fn create(&self, input: MatchInput) -> Result<Match, StoreError> {
        insert(&mut *self.matches.write().await, input)
    }

    async fn update(&self, id: &MatchId, input: MatchInput) -> Result<Match, StoreError> {
        replace(&mut self.matches.write().await, id, input)
    }

    async fn delete(&self, id: &MatchId) -> Result<Match, StoreError> {
        remove(&mut *self.matches.write().await, id)
    }

    async fn replace_all(&self, matches: Vec<Match>) -> Result<usize, StoreError> {
        let count = matches.len();
        *self.matches.write().await = matches;
        Ok(count)
    }
}

/// Store persisted to a JSONL file, rewritten after every change.
///
/// The whole collection is held in memory. A change is applied to a copy,
/// written out, and only then made visible.
pub struct JsonlMatchStore {
    path: PathBuf,
    matches: Mutex<Vec<Match>>,
}

impl JsonlMatchStore {
    /// Load the collection at `path`. A missing file starts an empty collection.
    ///
    /// Any line that does not parse as a match fails the open, since the next
    /// write would otherwise drop it from the file.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let matches = JsonlReader::<Match>::new(path.clone()).read_all()?;
        info!("Loaded {} matches from {:?}", matches.len(), path);

        Ok(Self {
            path,
            matches: Mutex::new(matches),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn persist(&self, matches: &[Match]) -> Result<(), StoreError> {
        let writer = JsonlWriter::new(self.path.clone());
        writer.write_all(matches)?;
        debug!("Persisted {} matches to {:?}", matches.len(), writer.path());
        Ok(())
    }

    async fn mutate<R>(
        &self,
        change: impl FnOnce(&mut Vec<Match>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut guard = self.matches.lock().await;
        let mut next = guard.clone();
        let out = change(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }
}

#[async_trait]
impl MatchStore for JsonlMatchStore {
    async fn find_all(&self) -> Result<Vec<Match>, StoreError> {
        Ok(newest_first(&self.matches.lock().await))
    }

    async fn find(&self, id: &MatchId) -> Result<Match, StoreError> {
        lookup(&self.matches.lock().await, id)
    }

    async fn create(&self, input: MatchInput) -> Result<Match, StoreError> {
        self.mutate(|matches| insert(matches, input)).await
    }

    async fn update(&self, id: &MatchId, input: MatchInput) -> Result<Match, StoreError> {
        self.mutate(|matches| replace(matches, id, input)).await
    }

    async fn delete(&self, id: &MatchId) -> Result<Match, StoreError> {
        self.mutate(|matches| remove(matches, id)).await
    }

    async fn replace_all(&self, matches: Vec<Match>) -> Result<usize, StoreError> {
        let count = matches.len();
        self.mutate(move |current| {
            *current = matches;
            Ok(())
        })
        .await?;
        Ok(count)
    }
}
