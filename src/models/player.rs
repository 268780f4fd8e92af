//! Per-match player statistics.

use serde::{Deserialize, Serialize};

/// One player's line on a match scoreboard.
///
/// Embedded in a [`Match`](super::Match); not independently addressable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStat {
    pub name: String,

    #[serde(default)]
    pub kills: u64,

    #[serde(default)]
    pub deaths: u64,

    #[serde(default)]
    pub debuffs: u64,

    #[serde(default)]
    pub damage: u64,

    #[serde(default)]
    pub damage_taken: u64,

    #[serde(default)]
    pub healing: u64,
}

impl PlayerStat {
    /// Create a scoreboard line with all counters at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_kills(mut self, kills: u64) -> Self {
        self.kills = kills;
        self
    }

    pub fn with_deaths(mut self, deaths: u64) -> Self {
        self.deaths = deaths;
        self
    }

    pub fn with_debuffs(mut self, debuffs: u64) -> Self {
        self.debuffs = debuffs;
        self
    }

    pub fn with_damage(mut self, damage: u64) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_damage_taken(mut self, damage_taken: u64) -> Self {
        self.damage_taken = damage_taken;
        self
    }

    pub fn with_healing(mut self, healing: u64) -> Self {
        self.healing = healing;
        self
    }
}
