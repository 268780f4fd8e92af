//! Match and player filtering.

use serde::{Deserialize, Serialize};

use crate::models::{Match, MatchResult, PlayerStats};

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Criteria for the match list. Every non-empty criterion must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFilter {
    /// Case-insensitive substring of either guild name
    #[serde(default)]
    pub guild: String,

    /// Case-insensitive substring of any player name on either roster
    #[serde(default)]
    pub player: String,

    #[serde(default)]
    pub result: Option<MatchResult>,

    /// Exact guild name on either side
    #[serde(default)]
    pub opponent: Option<String>,
}

impl MatchFilter {
    pub fn with_guild(mut self, guild: impl Into<String>) -> Self {
        self.guild = guild.into();
        self
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = player.into();
        self
    }

    pub fn with_result(mut self, result: MatchResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_opponent(mut self, opponent: impl Into<String>) -> Self {
        self.opponent = Some(opponent.into());
        self
    }

    /// True when no criterion restricts anything.
    pub fn is_empty(&self) -> bool {
        self.guild.is_empty()
            && self.player.is_empty()
            && self.result.is_none()
            && self.opponent.as_deref().map_or(true, str::is_empty)
    }

    pub fn matches(&self, m: &Match) -> bool {
        if !self.guild.is_empty()
            && !contains_ignore_case(&m.team1, &self.guild)
            && !contains_ignore_case(&m.team2, &self.guild)
        {
            return false;
        }

        if !self.player.is_empty()
            && !m
                .team1_players
                .iter()
                .chain(m.team2_players.iter())
                .any(|p| contains_ignore_case(&p.name, &self.player))
        {
            return false;
        }

        if let Some(result) = self.result {
            if m.result != result {
                return false;
            }
        }

        match self.opponent.as_deref() {
            Some(guild) if !guild.is_empty() => m.involves(guild),
            _ => true,
        }
    }
}

/// Keep the matches accepted by `filter`, preserving order.
pub fn filter_matches<'a>(matches: &'a [Match], filter: &MatchFilter) -> Vec<&'a Match> {
    matches.iter().filter(|m| filter.matches(m)).collect()
}

/// Criteria for leaderboard rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFilter {
    /// Case-insensitive substring of the player name
    #[serde(default)]
    pub name: String,
}

impl PlayerFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn matches(&self, row: &PlayerStats) -> bool {
        self.name.is_empty() || contains_ignore_case(row.name(), &self.name)
    }
}

/// Keep the rows accepted by `filter`, preserving order.
pub fn filter_players(rows: &[PlayerStats], filter: &PlayerFilter) -> Vec<PlayerStats> {
    rows.iter().filter(|r| filter.matches(r)).cloned().collect()
}
