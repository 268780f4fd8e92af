//! Match scoring policies.

use serde::{Deserialize, Serialize};

use crate::models::{Match, Side};

/// Upper bound on a side's derived score under the first-blood rule.
pub const DEFAULT_SCORE_CAP: u32 = 1000;

fn default_first_blood_bonus() -> u32 {
    100
}

fn default_score_cap() -> u32 {
    DEFAULT_SCORE_CAP
}

/// How a match's displayed score is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Report `team1Score` / `team2Score` as stored.
    #[default]
    Recorded,

    /// Add `bonus` to the side that drew first blood, then cap each side.
    FirstBlood {
        #[serde(default = "default_first_blood_bonus")]
        bonus: u32,
        #[serde(default = "default_score_cap")]
        cap: u32,
    },
}

impl ScoringPolicy {
    /// Derived `(team1, team2)` score. The bonus goes to the match's recorded
    /// first-blood side; without one only the cap applies.
    pub fn score(&self, m: &Match) -> (u32, u32) {
        match *self {
            ScoringPolicy::Recorded => (m.team1_score, m.team2_score),
            ScoringPolicy::FirstBlood { bonus, cap } => {
                let side_score = |side: Side| {
                    let base = m.score(side);
                    let with_bonus = if m.first_blood == Some(side) {
                        base.saturating_add(bonus)
                    } else {
                        base
                    };
                    with_bonus.min(cap)
                };
                (side_score(Side::Team1), side_score(Side::Team2))
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            ScoringPolicy::FirstBlood { cap: 0, .. } => {
                Err("first_blood scoring cap must be greater than 0".to_string())
            }
            _ => Ok(()),
        }
    }
}
