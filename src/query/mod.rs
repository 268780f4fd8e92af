//! Leaderboard and match-list view pipeline: filter, then sort, then paginate.

mod filter;
mod paginate;
mod sort;

pub use filter::*;
pub use paginate::*;
pub use sort::*;

use crate::models::{Match, PlayerStats};

/// Filter, sort and page a set of leaderboard rows.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardQuery {
    pub filter: PlayerFilter,
    pub sort: SortState,
    pub pagination: Pagination,
}

impl LeaderboardQuery {
    pub fn run(&self, rows: &[PlayerStats]) -> Page<PlayerStats> {
        let mut selected = filter_players(rows, &self.filter);
        sort_players(&mut selected, self.sort);
        paginate(&selected, &self.pagination)
    }
}

/// Filter and page the match list, newest first.
#[derive(Debug, Clone, Default)]
pub struct MatchQuery {
    pub filter: MatchFilter,
    pub pagination: Pagination,
}

impl MatchQuery {
    pub fn run(&self, matches: &[Match]) -> Page<Match> {
        let mut selected = filter_matches(matches, &self.filter);
        sort_matches_newest_first(&mut selected);
        let owned: Vec<Match> = selected.into_iter().cloned().collect();
        paginate(&owned, &self.pagination)
    }
}
