//! Match records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{MatchId, PlayerStat};

/// Date format used for match dates.
pub const MATCH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of a match, relative to team1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    Victory,
    Defeat,
}

impl MatchResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchResult::Victory => "Victory",
            MatchResult::Defeat => "Defeat",
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MatchResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "victory" | "win" => Ok(MatchResult::Victory),
            "defeat" | "loss" => Ok(MatchResult::Defeat),
            other => Err(format!("unknown result: {}", other)),
        }
    }
}

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }
}

/// Validation failures for a match payload. Every problem is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.errors.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// A match payload without store-assigned fields.
///
/// This is the body of a create request and the editable part of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInput {
    pub date: String,
    pub team1: String,
    pub team2: String,
    pub result: MatchResult,
    pub team1_score: u32,
    pub team2_score: u32,
    #[serde(default)]
    pub team1_players: Vec<PlayerStat>,
    #[serde(default)]
    pub team2_players: Vec<PlayerStat>,
    /// Side credited with first blood, when it was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_blood: Option<Side>,
}

impl MatchInput {
    /// Create an input with empty rosters and a 0-0 score.
    pub fn new(
        date: impl Into<String>,
        team1: impl Into<String>,
        team2: impl Into<String>,
        result: MatchResult,
    ) -> Self {
        Self {
            date: date.into(),
            team1: team1.into(),
            team2: team2.into(),
            result,
            team1_score: 0,
            team2_score: 0,
            team1_players: Vec::new(),
            team2_players: Vec::new(),
            first_blood: None,
        }
    }

    pub fn with_scores(mut self, team1_score: u32, team2_score: u32) -> Self {
        self.team1_score = team1_score;
        self.team2_score = team2_score;
        self
    }

    pub fn with_team1_player(mut self, player: PlayerStat) -> Self {
        self.team1_players.push(player);
        self
    }

    pub fn with_team2_player(mut self, player: PlayerStat) -> Self {
        self.team2_players.push(player);
        self
    }

    /// Trim names and drop roster rows whose name is blank.
    ///
    /// The admin form always submits a fixed number of roster slots; unused
    /// ones arrive with empty names.
    pub fn normalized(mut self) -> Self {
        self.date = self.date.trim().to_string();
        self.team1 = self.team1.trim().to_string();
        self.team2 = self.team2.trim().to_string();
        for roster in [&mut self.team1_players, &mut self.team2_players] {
            roster.retain(|p| !p.name.trim().is_empty());
            for player in roster.iter_mut() {
                player.name = player.name.trim().to_string();
            }
        }
        self
    }

    /// Check required fields, collecting every problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if self.date.trim().is_empty() {
            errors.push("date is required".to_string());
        } else if NaiveDate::parse_from_str(self.date.trim(), MATCH_DATE_FORMAT).is_err() {
            errors.push(format!("date must be YYYY-MM-DD, got {:?}", self.date));
        }

        if self.team1.trim().is_empty() {
            errors.push("team1 is required".to_string());
        }
        if self.team2.trim().is_empty() {
            errors.push("team2 is required".to_string());
        }

        if self.team1_players.is_empty() {
            errors.push("team1Players must list at least one player".to_string());
        }

        for (label, roster) in [
            ("team1Players", &self.team1_players),
            ("team2Players", &self.team2_players),
        ] {
            for (i, player) in roster.iter().enumerate() {
                if player.name.trim().is_empty() {
                    errors.push(format!("{}[{}]: name is required", label, i));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }
}

impl From<&Match> for MatchInput {
    fn from(m: &Match) -> Self {
        Self {
            date: m.date.clone(),
            team1: m.team1.clone(),
            team2: m.team2.clone(),
            result: m.result,
            team1_score: m.team1_score,
            team2_score: m.team2_score,
            team1_players: m.team1_players.clone(),
            team2_players: m.team2_players.clone(),
            first_blood: m.first_blood,
        }
    }
}

/// Full replacement of an existing match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchUpdate {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MatchId>,

    #[serde(flatten)]
    pub input: MatchInput,
}

impl MatchUpdate {
    pub fn new(id: MatchId, input: MatchInput) -> Self {
        Self {
            id: Some(id),
            input,
        }
    }
}

/// A stored match record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(rename = "_id")]
    pub id: MatchId,
    pub date: String,
    pub team1: String,
    pub team2: String,
    pub result: MatchResult,
    pub team1_score: u32,
    pub team2_score: u32,
    #[serde(default)]
    pub team1_players: Vec<PlayerStat>,
    #[serde(default)]
    pub team2_players: Vec<PlayerStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_blood: Option<Side>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// Materialize a stored record from an input payload.
    pub fn from_input(id: MatchId, input: MatchInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            date: input.date,
            team1: input.team1,
            team2: input.team2,
            result: input.result,
            team1_score: input.team1_score,
            team2_score: input.team2_score,
            team1_players: input.team1_players,
            team2_players: input.team2_players,
            first_blood: input.first_blood,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every editable field, keeping identity and creation time.
    pub fn replace_with(&mut self, input: MatchInput, now: DateTime<Utc>) {
        self.date = input.date;
        self.team1 = input.team1;
        self.team2 = input.team2;
        self.result = input.result;
        self.team1_score = input.team1_score;
        self.team2_score = input.team2_score;
        self.team1_players = input.team1_players;
        self.team2_players = input.team2_players;
        self.first_blood = input.first_blood;
        self.updated_at = now;
    }

    /// The side that won.
    pub fn winner(&self) -> Side {
        match self.result {
            MatchResult::Victory => Side::Team1,
            MatchResult::Defeat => Side::Team2,
        }
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    pub fn players(&self, side: Side) -> &[PlayerStat] {
        match side {
            Side::Team1 => &self.team1_players,
            Side::Team2 => &self.team2_players,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Team1 => self.team1_score,
            Side::Team2 => self.team2_score,
        }
    }

    /// Which side the guild played on. team1 is checked first.
    pub fn side_of(&self, guild: &str) -> Option<Side> {
        if self.team1 == guild {
            Some(Side::Team1)
        } else if self.team2 == guild {
            Some(Side::Team2)
        } else {
            None
        }
    }

    /// Whether the guild took part in this match.
    pub fn involves(&self, guild: &str) -> bool {
        self.side_of(guild).is_some()
    }

    /// Whether the given side won.
    pub fn won_by(&self, side: Side) -> bool {
        self.winner() == side
    }
}
