//! Derived statistics models.

use serde::{Deserialize, Serialize};

use super::{MatchId, MatchResult, PlayerStat};
use crate::calculate::{average, kd_ratio, percent_rounded, percent_to_tenth};

/// Win/loss record of a guild over a set of matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallRecord {
    pub total_matches: u32,
    pub victories: u32,
    pub defeats: u32,
    /// Whole percent, 0 when there are no matches
    pub win_rate: u32,
}

impl OverallRecord {
    pub fn from_counts(victories: u32, defeats: u32) -> Self {
        let total_matches = victories + defeats;
        Self {
            total_matches,
            victories,
            defeats,
            win_rate: percent_rounded(victories, total_matches),
        }
    }
}

/// Cumulative counters for one player, keyed by exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTotals {
    pub name: String,
    pub matches: u32,
    pub victories: u32,
    pub defeats: u32,
    pub kills: u64,
    pub deaths: u64,
    pub debuffs: u64,
    pub damage: u64,
    pub damage_taken: u64,
    pub healing: u64,
    pub best_kills: u64,
    pub best_damage: u64,
    pub best_debuffs: u64,
    pub worst_deaths: u64,
}

impl PlayerTotals {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Fold one scoreboard line into the totals. Sums saturate at `u64::MAX`.
    pub fn record(&mut self, line: &PlayerStat, won: bool) {
        self.matches += 1;
        if won {
            self.victories += 1;
        } else {
            self.defeats += 1;
        }

        self.kills = self.kills.saturating_add(line.kills);
        self.deaths = self.deaths.saturating_add(line.deaths);
        self.debuffs = self.debuffs.saturating_add(line.debuffs);
        self.damage = self.damage.saturating_add(line.damage);
        self.damage_taken = self.damage_taken.saturating_add(line.damage_taken);
        self.healing = self.healing.saturating_add(line.healing);

        self.best_kills = self.best_kills.max(line.kills);
        self.best_damage = self.best_damage.max(line.damage);
        self.best_debuffs = self.best_debuffs.max(line.debuffs);
        self.worst_deaths = self.worst_deaths.max(line.deaths);
    }
}

/// Per-match averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerAverages {
    pub kills: f64,
    pub deaths: f64,
    pub debuffs: f64,
    pub damage: f64,
    pub damage_taken: f64,
    pub healing: f64,
}

/// A leaderboard row: totals plus derived ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(flatten)]
    pub totals: PlayerTotals,

    /// Kills per death; kills when the player never died
    pub kd: f64,

    /// Percent of matches won, rounded to one decimal
    pub win_rate: f64,

    pub averages: PlayerAverages,
}

impl PlayerStats {
    pub fn from_totals(totals: PlayerTotals) -> Self {
        let kd = kd_ratio(totals.kills, totals.deaths);
        let win_rate = percent_to_tenth(totals.victories, totals.victories + totals.defeats);
        let n = totals.matches;
        let averages = PlayerAverages {
            kills: average(totals.kills, n),
            deaths: average(totals.deaths, n),
            debuffs: average(totals.debuffs, n),
            damage: average(totals.damage, n),
            damage_taken: average(totals.damage_taken, n),
            healing: average(totals.healing, n),
        };

        Self {
            totals,
            kd,
            win_rate,
            averages,
        }
    }

    pub fn name(&self) -> &str {
        &self.totals.name
    }
}

/// The best single-match value of one stat, with where it happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPerformer {
    /// Empty until some player posts a value above zero
    pub name: String,
    pub value: u64,
    pub opponent: String,
    pub date: String,
    pub match_id: Option<MatchId>,
}

impl TopPerformer {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Single-match records for the four headline stats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPerformers {
    pub kills: TopPerformer,
    pub deaths: TopPerformer,
    pub damage: TopPerformer,
    pub debuffs: TopPerformer,
}

/// Summed counters for one side of one or more matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideTotals {
    pub kills: u64,
    pub deaths: u64,
    pub damage: u64,
    pub debuffs: u64,
}

impl SideTotals {
    pub fn from_players(players: &[PlayerStat]) -> Self {
        players.iter().fold(Self::default(), |mut acc, p| {
            acc.kills = acc.kills.saturating_add(p.kills);
            acc.deaths = acc.deaths.saturating_add(p.deaths);
            acc.damage = acc.damage.saturating_add(p.damage);
            acc.debuffs = acc.debuffs.saturating_add(p.debuffs);
            acc
        })
    }

    pub fn add(&mut self, other: &SideTotals) {
        self.kills = self.kills.saturating_add(other.kills);
        self.deaths = self.deaths.saturating_add(other.deaths);
        self.damage = self.damage.saturating_add(other.damage);
        self.debuffs = self.debuffs.saturating_add(other.debuffs);
    }
}

/// One match seen from the home guild's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub date: String,
    pub opponent: String,
    /// Outcome for the home guild
    pub result: MatchResult,
    pub home: SideTotals,
    pub opponent_totals: SideTotals,
}

/// Everything derived for the home guild over one view of the matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildStats {
    pub guild: String,
    pub record: OverallRecord,
    /// Rows in the order players were first seen
    pub players: Vec<PlayerStats>,
    pub top: TopPerformers,
    pub totals: SideTotals,
    pub history: Vec<MatchSummary>,
}

impl GuildStats {
    /// Get a player row by exact name.
    pub fn player(&self, name: &str) -> Option<&PlayerStats> {
        self.players.iter().find(|p| p.name() == name)
    }
}

/// Head-to-head statistics against one rival guild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RivalBreakdown {
    pub rival: String,
    /// Home guild view restricted to matches against the rival
    pub home: GuildStats,
    /// The rival's own players in those matches
    pub rival_players: Vec<PlayerStats>,
    pub rival_top: TopPerformers,
}

/// Landing-page digest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildSummary {
    pub record: OverallRecord,
    pub total_kills: u64,
    pub total_damage: u64,
    pub top_killers: Vec<PlayerStats>,
    pub top_damage: Vec<PlayerStats>,
    pub recent_victories: Vec<MatchSummary>,
}
