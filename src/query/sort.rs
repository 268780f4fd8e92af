//! Leaderboard and match ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Match, PlayerStats, MATCH_DATE_FORMAT};

/// Sortable leaderboard columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Kd,
    Kills,
    Deaths,
    Debuffs,
    Damage,
    DamageTaken,
    Healing,
    Matches,
    WinRate,
    Name,
}

impl SortField {
    pub const ALL: [SortField; 10] = [
        SortField::Kd,
        SortField::Kills,
        SortField::Deaths,
        SortField::Debuffs,
        SortField::Damage,
        SortField::DamageTaken,
        SortField::Healing,
        SortField::Matches,
        SortField::WinRate,
        SortField::Name,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Kd => "kd",
            SortField::Kills => "kills",
            SortField::Deaths => "deaths",
            SortField::Debuffs => "debuffs",
            SortField::Damage => "damage",
            SortField::DamageTaken => "damageTaken",
            SortField::Healing => "healing",
            SortField::Matches => "matches",
            SortField::WinRate => "winRate",
            SortField::Name => "name",
        }
    }

    /// Numeric sort key; `None` for the name column.
    fn key(&self, row: &PlayerStats) -> Option<f64> {
        let t = &row.totals;
        let value = match self {
            SortField::Kd => row.kd,
            SortField::Kills => t.kills as f64,
            SortField::Deaths => t.deaths as f64,
            SortField::Debuffs => t.debuffs as f64,
            SortField::Damage => t.damage as f64,
            SortField::DamageTaken => t.damage_taken as f64,
            SortField::Healing => t.healing as f64,
            SortField::Matches => t.matches as f64,
            SortField::WinRate => row.win_rate,
            SortField::Name => return None,
        };
        Some(value)
    }

    /// Ascending comparison of two rows on this column.
    pub fn compare(&self, a: &PlayerStats, b: &PlayerStats) -> Ordering {
        match (self.key(a), self.key(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => a.name().cmp(b.name()),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['_', '-'], "");
        SortField::ALL
            .iter()
            .find(|f| f.as_str().to_lowercase() == wanted)
            .copied()
            .ok_or_else(|| format!("unknown sort field: {}", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Current leaderboard ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Kd,
            order: SortOrder::Desc,
        }
    }
}

impl SortState {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Selecting the active column flips the order; a new column starts descending.
    pub fn toggle(self, field: SortField) -> Self {
        if field == self.field {
            Self {
                field,
                order: self.order.flipped(),
            }
        } else {
            Self {
                field,
                order: SortOrder::Desc,
            }
        }
    }
}

/// Stable sort of leaderboard rows.
pub fn sort_players(rows: &mut [PlayerStats], state: SortState) {
    match state.order {
        SortOrder::Asc => rows.sort_by(|a, b| state.field.compare(a, b)),
        SortOrder::Desc => rows.sort_by(|a, b| state.field.compare(b, a)),
    }
}

/// Newest date first. Unparseable dates sort after real ones, then by raw text.
pub fn compare_dates_desc(a: &str, b: &str) -> Ordering {
    let parse = |s: &str| NaiveDate::parse_from_str(s.trim(), MATCH_DATE_FORMAT).ok();
    match (parse(a), parse(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}

/// Stable sort of matches, newest first.
pub fn sort_matches_newest_first(matches: &mut [&Match]) {
    matches.sort_by(|a, b| compare_dates_desc(&a.date, &b.date));
}
