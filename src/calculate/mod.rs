//! Statistics calculation engine.
//!
//! Folds match records into derived metrics:
//! - Overall guild win/loss record
//! - Per-player totals, ratios and averages
//! - Single-match top performers
//! - Head-to-head breakdowns per rival
//! - Configurable match scoring
//!
//! Everything here is pure: no I/O, no shared state, same input same output.

mod aggregate;
mod scoring;

pub use aggregate::*;
pub use scoring::*;

/// Kills per death. A player who never died scores their kill count.
pub fn kd_ratio(kills: u64, deaths: u64) -> f64 {
    if deaths == 0 {
        kills as f64
    } else {
        kills as f64 / deaths as f64
    }
}

/// `part / total` as a whole percentage, 0 when `total` is 0.
pub fn percent_rounded(part: u32, total: u32) -> u32 {
    if total == 0 {
        0
    } else {
        (part as f64 / total as f64 * 100.0).round() as u32
    }
}

/// `part / total` as a percentage rounded to one decimal, 0 when `total` is 0.
pub fn percent_to_tenth(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_to_tenth(part as f64 / total as f64 * 100.0)
    }
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean per match, 0 when `count` is 0.
pub fn average(sum: u64, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}
