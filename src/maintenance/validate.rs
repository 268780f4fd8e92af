//! Validation of hand-written match files before submission.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::MaintenanceError;
use crate::models::MatchInput;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReport {
    pub index: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub entries: usize,
    pub invalid: Vec<EntryReport>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

fn check_entry(value: Value) -> Vec<String> {
    match serde_json::from_value::<MatchInput>(value) {
        Ok(input) => match input.normalized().validate() {
            Ok(()) => Vec::new(),
            Err(e) => e.errors,
        },
        Err(e) => vec![e.to_string()],
    }
}

/// Check a single match object or an array of them.
pub fn validate_value(value: Value) -> FileReport {
    let entries = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut report = FileReport {
        entries: entries.len(),
        invalid: Vec::new(),
    };
    for (index, entry) in entries.into_iter().enumerate() {
        let errors = check_entry(entry);
        if !errors.is_empty() {
            report.invalid.push(EntryReport { index, errors });
        }
    }
    report
}

pub fn validate_file(path: &Path) -> Result<FileReport, MaintenanceError> {
    let value: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(validate_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn good() -> Value {
        json!({
            "date": "2025-08-12",
            "team1": "Manifest",
            "team2": "Guilty",
            "result": "Victory",
            "team1Score": 1,
            "team2Score": 0,
            "team1Players": [{ "name": "Ann", "kills": 2 }]
        })
    }

    #[test]
    fn test_single_valid_object() {
        let report = validate_value(good());
        assert_eq!(report.entries, 1);
        assert!(report.is_valid());
    }

    #[test]
    fn test_array_reports_each_bad_entry() {
        let mut missing_team = good();
        missing_team["team2"] = json!(" ");
        let mut negative = good();
        negative["team1Players"][0]["deaths"] = json!(-1);

        let report = validate_value(json!([good(), missing_team, negative]));
        assert_eq!(report.entries, 3);
        let indexes: Vec<_> = report.invalid.iter().map(|e| e.index).collect();
        assert_eq!(indexes, vec![1, 2]);
        assert_eq!(report.invalid[0].errors, vec!["team2 is required"]);
    }

    #[test]
    fn test_validate_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match-data.json");
        fs::write(&path, good().to_string()).unwrap();
        assert!(validate_file(&path).unwrap().is_valid());

        fs::write(&path, "not json").unwrap();
        assert!(matches!(validate_file(&path), Err(MaintenanceError::Json(_))));
    }
}
