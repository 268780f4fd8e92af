//! Session snapshot of the match collection.

use tokio::sync::RwLock;
use tracing::warn;

use super::{ClientError, MatchClient};
use crate::models::{Match, MatchId};

/// Handed out by [`MatchBoard::begin_refresh`]; only the newest ticket may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// Last successfully fetched match list plus refresh bookkeeping.
///
/// A failed refresh records the error and keeps the previous list.
#[derive(Debug, Default)]
pub struct MatchBoard {
    matches: Vec<Match>,
    generation: u64,
    loaded: bool,
    last_error: Option<String>,
}

impl MatchBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// True once any refresh has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        RefreshTicket(self.generation)
    }

    /// Apply a refresh result. Returns false (and changes nothing) when a newer
    /// refresh has started since `ticket` was issued.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<Match>, ClientError>,
    ) -> bool {
        if ticket.0 != self.generation {
            return false;
        }

        match result {
            Ok(matches) => {
                self.matches = matches;
                self.loaded = true;
                self.last_error = None;
            }
            Err(e) => {
                warn!("Match refresh failed, keeping previous snapshot: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    pub fn apply_created(&mut self, created: Match) {
        self.matches.insert(0, created);
    }

    pub fn apply_updated(&mut self, updated: Match) {
        match self.matches.iter_mut().find(|m| m.id == updated.id) {
            Some(slot) => *slot = updated,
            None => self.matches.insert(0, updated),
        }
    }

    pub fn apply_deleted(&mut self, id: &MatchId) {
        self.matches.retain(|m| &m.id != id);
    }
}

/// Fetch the list and land it on `board` without holding the lock during the request.
pub async fn refresh(board: &RwLock<MatchBoard>, client: &MatchClient) -> bool {
    let ticket = board.write().await.begin_refresh();
    let result = client.list_matches().await;
    board.write().await.complete_refresh(ticket, result)
}
