//! Timestamped JSON backups of the match collection.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::MaintenanceError;
use crate::models::Match;

const BACKUP_PREFIX: &str = "backup-";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupCollections {
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub total_matches: usize,
    pub backup_date: String,
    pub backup_time: String,
}

/// A full backup file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    pub timestamp: DateTime<Utc>,
    pub collections: BackupCollections,
    pub metadata: BackupMetadata,
}

/// Either layout accepted on restore.
#[derive(Deserialize)]
#[serde(untagged)]
enum BackupFile {
    Full(Backup),
    Bare(Vec<Match>),
}

impl Backup {
    pub fn new(matches: Vec<Match>, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now,
            metadata: BackupMetadata {
                total_matches: matches.len(),
                backup_date: now.format("%Y-%m-%d").to_string(),
                backup_time: file_timestamp(now),
            },
            collections: BackupCollections { matches },
        }
    }

    /// `backup-<date>-<timestamp>.json`
    pub fn file_name(&self) -> String {
        format!(
            "{}{}-{}.json",
            BACKUP_PREFIX, self.metadata.backup_date, self.metadata.backup_time
        )
    }
}

/// RFC 3339 with millisecond precision, `:` and `.` replaced so it is filename-safe.
fn file_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Write a pretty-printed backup into `dir`, returning its path.
pub fn write_backup(
    dir: &Path,
    matches: Vec<Match>,
    now: DateTime<Utc>,
) -> Result<PathBuf, MaintenanceError> {
    fs::create_dir_all(dir)?;

    let backup = Backup::new(matches, now);
    let path = dir.join(backup.file_name());
    fs::write(&path, serde_json::to_string_pretty(&backup)?)?;

    info!(
        "Backed up {} matches to {:?}",
        backup.metadata.total_matches, path
    );
    Ok(path)
}

/// Read the matches from a full backup or from a bare JSON array of matches.
pub fn read_backup(path: &Path) -> Result<Vec<Match>, MaintenanceError> {
    let contents = fs::read_to_string(path)?;
    let matches = match serde_json::from_str::<BackupFile>(&contents) {
        Ok(BackupFile::Full(backup)) => backup.collections.matches,
        Ok(BackupFile::Bare(matches)) => matches,
        // Re-parse as the full layout for a useful error message.
        Err(_) => serde_json::from_str::<Backup>(&contents)?.collections.matches,
    };
    Ok(matches)
}

/// Newest `backup-*.json` in `dir`. Names sort chronologically.
pub fn latest_backup(dir: &Path) -> Result<PathBuf, MaintenanceError> {
    if !dir.exists() {
        return Err(MaintenanceError::NoBackups(dir.to_path_buf()));
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(BACKUP_PREFIX) && name.ends_with(".json") && entry.file_type()?.is_file()
        {
            candidates.push(entry.path());
        }
    }

    candidates.sort();
    candidates
        .pop()
        .ok_or_else(|| MaintenanceError::NoBackups(dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchId, MatchInput, MatchResult, PlayerStat};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample(id: &str) -> Match {
        let input = MatchInput::new("2025-08-12", "Manifest", "Guilty", MatchResult::Victory)
            .with_scores(4, 2)
            .with_team1_player(PlayerStat::new("Ann").with_kills(3));
        Match::from_input(MatchId::from(id), input, Utc::now())
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 12, h, m, 19).unwrap()
    }

    #[test]
    fn test_file_name_format() {
        let backup = Backup::new(vec![], at(21, 41));
        assert_eq!(
            backup.file_name(),
            "backup-2025-08-12-2025-08-12T21-41-19-000Z.json"
        );
    }

    #[test]
    fn test_write_and_read_backup() {
        let dir = TempDir::new().unwrap();
        let matches = vec![sample("a"), sample("b")];

        let path = write_backup(dir.path(), matches.clone(), at(10, 0)).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["metadata"]["totalMatches"], 2);
        assert_eq!(raw["collections"]["matches"][0]["_id"], "a");

        assert_eq!(read_backup(&path).unwrap(), matches);
    }

    #[test]
    fn test_read_bare_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data-only.json");
        let matches = vec![sample("x")];
        fs::write(&path, serde_json::to_string(&matches).unwrap()).unwrap();

        assert_eq!(read_backup(&path).unwrap(), matches);
    }

    #[test]
    fn test_read_garbage_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, r#"{"hello": "world"}"#).unwrap();

        assert!(matches!(read_backup(&path), Err(MaintenanceError::Json(_))));
    }

    #[test]
    fn test_latest_backup() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            latest_backup(dir.path()),
            Err(MaintenanceError::NoBackups(_))
        ));

        write_backup(dir.path(), vec![], at(9, 0)).unwrap();
        let newest = write_backup(dir.path(), vec![], at(22, 30)).unwrap();
        write_backup(dir.path(), vec![], at(11, 15)).unwrap();
        fs::write(dir.path().join("name-mapping.json"), "{}").unwrap();

        assert_eq!(latest_backup(dir.path()).unwrap(), newest);
    }
}
