use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{SecondsFormat, Utc};

use crate::types::DecryptionOutcome;

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Write outcomes to a timestamped file in the working directory and
/// return the path written.
pub fn export_results(outcomes: &[DecryptionOutcome], format: ExportFormat) -> Result<PathBuf> {
    let path = PathBuf::from(export_filename(format));
    let content = match format {
        ExportFormat::Json => to_json_string(outcomes)?,
        ExportFormat::Csv => to_csv_string(outcomes),
    };
    fs::write(&path, content)?;
    log::info!("Exported {} outcomes to {}", outcomes.len(), path.display());
    Ok(path)
}

/// `decryption_results_<ISO8601 UTC with ':' and '.' replaced by '-'>.<ext>`
pub fn export_filename(format: ExportFormat) -> String {
    let stamp = Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("decryption_results_{}.{}", stamp, format.extension())
}

/// Pretty-printed JSON array of outcome objects.
pub fn to_json_string(outcomes: &[DecryptionOutcome]) -> Result<String> {
    Ok(serde_json::to_string_pretty(outcomes)?)
}

/// CSV with an `_id,status,decrypted` header; every field is quoted
/// with `""` escaping.
pub fn to_csv_string(outcomes: &[DecryptionOutcome]) -> String {
    let mut out = String::from("\"_id\",\"status\",\"decrypted\"\n");
    for outcome in outcomes {
        let row = [
            outcome.id.as_str(),
            outcome.status.as_str(),
            outcome.plaintext.as_deref().unwrap_or(""),
        ];
        let quoted: Vec<String> = row
            .iter()
            .map(|f| format!("\"{}\"", f.replace('"', "\"\"")))
            .collect();
        out.push_str(&quoted.join(","));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OutcomeStatus;

    fn outcomes() -> Vec<DecryptionOutcome> {
        vec![
            DecryptionOutcome {
                id: "a".to_string(),
                status: OutcomeStatus::Success,
                plaintext: Some("123-45-6789".to_string()),
            },
            DecryptionOutcome {
                id: "b".to_string(),
                status: OutcomeStatus::Failed,
                plaintext: None,
            },
        ]
    }

    #[test]
    fn test_json_shape() {
        let json = to_json_string(&outcomes()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["_id"], "a");
        assert_eq!(items[0]["status"], "Success");
        assert_eq!(items[0]["decrypted"], "123-45-6789");
        // Non-success outcomes omit the decrypted field entirely.
        assert!(items[1].get("decrypted").is_none());
        assert_eq!(items[1]["status"], "Failed");
    }

    #[test]
    fn test_csv_quoting() {
        let rows = vec![DecryptionOutcome {
            id: "id \"x\", y".to_string(),
            status: OutcomeStatus::Success,
            plaintext: Some("val".to_string()),
        }];
        let csv = to_csv_string(&rows);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("\"_id\",\"status\",\"decrypted\""));
        assert_eq!(lines.next(), Some("\"id \"\"x\"\", y\",\"Success\",\"val\""));
    }

    #[test]
    fn test_csv_failed_row_has_empty_value() {
        let csv = to_csv_string(&outcomes());
        assert!(csv.lines().any(|l| l == "\"b\",\"Failed\",\"\""));
    }

    #[test]
    fn test_filename_pattern() {
        let name = export_filename(ExportFormat::Json);
        assert!(name.starts_with("decryption_results_"));
        assert!(name.ends_with(".json"));
        let stem = name.trim_end_matches(".json");
        assert!(!stem.contains(':'));
        assert!(!stem.contains('.'));
        assert!(stem.ends_with('Z'));
    }
}
