//! Player-name consolidation.
//!
//! Names that only differ by case or whitespace are grouped and mapped onto
//! one canonical spelling.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::MaintenanceError;
use crate::models::Match;

/// Trim, lowercase and collapse inner whitespace.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn is_capitalized(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str();
            first.to_uppercase().eq(std::iter::once(first)) && rest == rest.to_lowercase()
        }
        None => false,
    }
}

/// Pick the canonical spelling from a sorted group: the first already-trimmed
/// name, else the first Capitalized one, else the first.
pub fn suggest_canonical(names: &[String]) -> Option<&str> {
    names
        .iter()
        .find(|n| n.trim() == n.as_str())
        .or_else(|| names.iter().find(|n| is_capitalized(n)))
        .or_else(|| names.first())
        .map(String::as_str)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameGroup {
    pub normalized: String,
    /// Distinct spellings, sorted
    pub names: Vec<String>,
    pub suggested: String,
}

/// Every distinct player name across both rosters of every match.
pub fn unique_player_names(matches: &[Match]) -> BTreeSet<String> {
    matches
        .iter()
        .flat_map(|m| m.team1_players.iter().chain(m.team2_players.iter()))
        .map(|p| p.name.clone())
        .collect()
}

/// Groups of two or more spellings sharing a normalized form, ordered by that form.
pub fn find_similar_names(matches: &[Match]) -> Vec<NameGroup> {
    let mut by_normalized: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for name in unique_player_names(matches) {
        by_normalized
            .entry(normalize_name(&name))
            .or_default()
            .push(name);
    }

    by_normalized
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .filter_map(|(normalized, names)| {
            let suggested = suggest_canonical(&names)?.to_string();
            Some(NameGroup {
                normalized,
                names,
                suggested,
            })
        })
        .collect()
}

/// Proposal written to `name-mapping.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameMapping {
    pub timestamp: DateTime<Utc>,
    pub total_matches: usize,
    pub total_unique_names: usize,
    pub similar_groups: usize,
    /// Old spelling to canonical spelling
    pub mapping: BTreeMap<String, String>,
}

impl NameMapping {
    pub fn build(matches: &[Match], now: DateTime<Utc>) -> Self {
        let groups = find_similar_names(matches);

        let mut mapping = BTreeMap::new();
        for group in &groups {
            for name in &group.names {
                if name != &group.suggested {
                    mapping.insert(name.clone(), group.suggested.clone());
                }
            }
        }

        Self {
            timestamp: now,
            total_matches: matches.len(),
            total_unique_names: unique_player_names(matches).len(),
            similar_groups: groups.len(),
            mapping,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Rename players in place. Returns how many matches changed.
    pub fn apply(&self, matches: &mut [Match]) -> usize {
        let mut changed = 0;
        for m in matches.iter_mut() {
            let mut touched = false;
            for player in m.team1_players.iter_mut().chain(m.team2_players.iter_mut()) {
                if let Some(canonical) = self.mapping.get(&player.name) {
                    player.name = canonical.clone();
                    touched = true;
                }
            }
            if touched {
                m.updated_at = Utc::now();
                changed += 1;
            }
        }
        changed
    }

    pub fn write(&self, path: &Path) -> Result<(), MaintenanceError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Wrote {} name mappings to {:?}", self.mapping.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchId, MatchInput, MatchResult, PlayerStat};
    use pretty_assertions::assert_eq;

    fn with_players(id: &str, home: &[&str], away: &[&str]) -> Match {
        let mut input = MatchInput::new("2025-08-01", "Manifest", "Guilty", MatchResult::Victory);
        for name in home {
            input = input.with_team1_player(PlayerStat::new(*name));
        }
        for name in away {
            input = input.with_team2_player(PlayerStat::new(*name));
        }
        Match::from_input(MatchId::from(id), input, Utc::now())
    }

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Dark   Knight "), "dark knight");
        assert_eq!(normalize_name("ANN"), "ann");
    }

    #[test]
    fn test_suggest_prefers_trimmed_then_capitalized() {
        assert_eq!(suggest_canonical(&strings(&[" Ann", "ann"])), Some("ann"));
        assert_eq!(suggest_canonical(&strings(&[" aNN", "Ann "])), Some("Ann "));
        assert_eq!(suggest_canonical(&strings(&[" aNN", " ANN "])), Some(" aNN"));
        assert_eq!(suggest_canonical(&[]), None);
    }

    #[test]
    fn test_find_similar_names() {
        let matches = vec![
            with_players("1", &["Ann", "Bo"], &["Zed"]),
            with_players("2", &["ann", "Bo "], &["zed"]),
            with_players("3", &["Cyra"], &[]),
        ];

        let groups = find_similar_names(&matches);
        let summary: Vec<(&str, &str)> = groups
            .iter()
            .map(|g| (g.normalized.as_str(), g.suggested.as_str()))
            .collect();
        assert_eq!(summary, vec![("ann", "Ann"), ("bo", "Bo"), ("zed", "Zed")]);
        assert_eq!(groups[0].names, strings(&["Ann", "ann"]));
    }

    #[test]
    fn test_build_and_apply_mapping() {
        let mut matches = vec![
            with_players("1", &["Ann"], &["Zed"]),
            with_players("2", &["ann"], &["Zed"]),
            with_players("3", &["Cyra"], &[]),
        ];

        let mapping = NameMapping::build(&matches, Utc::now());
        assert_eq!(mapping.total_matches, 3);
        assert_eq!(mapping.total_unique_names, 4);
        assert_eq!(mapping.similar_groups, 1);
        assert_eq!(
            mapping.mapping,
            BTreeMap::from([("ann".to_string(), "Ann".to_string())])
        );

        assert_eq!(mapping.apply(&mut matches), 1);
        assert_eq!(matches[1].team1_players[0].name, "Ann");
        assert!(find_similar_names(&matches).is_empty());
    }

    #[test]
    fn test_no_duplicates_is_empty_mapping() {
        let matches = vec![with_players("1", &["Ann", "Bo"], &[])];
        let mapping = NameMapping::build(&matches, Utc::now());
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_write_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("name-mapping.json");
        let matches = vec![with_players("1", &["Ann", "ann"], &[])];

        NameMapping::build(&matches, Utc::now()).write(&path).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["similarGroups"], 1);
        assert_eq!(raw["mapping"]["ann"], "Ann");
    }
}
