use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::SourceError;
use crate::types::EncryptedRecord;

const SSN_FIELD: &str = "socialSecurityNumber";
const ID_FIELD: &str = "_id";

/// Load records from a JSON file. The root must be an array.
pub fn records_from_json_file(path: &Path) -> Result<Vec<EncryptedRecord>, SourceError> {
    let content = fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    records_from_json_str(&content)
}

/// Parse a JSON array of records.
///
/// Each element may carry `_id` as a plain string or as a `{"$oid": ...}`
/// wrapper; any other shape yields no id. A missing or non-string
/// `socialSecurityNumber` leaves the payload empty so the record flows
/// through as Invalid instead of aborting the parse.
pub fn records_from_json_str(content: &str) -> Result<Vec<EncryptedRecord>, SourceError> {
    let root: Value = serde_json::from_str(content)?;
    let items = root.as_array().ok_or(SourceError::NotAnArray)?;

    let records = items
        .iter()
        .map(|item| {
            let id = item.get(ID_FIELD).and_then(resolve_id);
            let payload = item
                .get(SSN_FIELD)
                .and_then(Value::as_str)
                .map(str::to_string);
            EncryptedRecord::new(id, payload)
        })
        .collect::<Vec<_>>();

    log::debug!("Parsed {} records from JSON", records.len());
    Ok(records)
}

/// Unwrap the `_id` field: plain strings pass through, Mongo-style
/// `{"$oid": "..."}` objects are unwrapped, anything else is dropped.
fn resolve_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Load records from a CSV file with a header row.
pub fn records_from_csv_file(path: &Path) -> Result<Vec<EncryptedRecord>, SourceError> {
    let content = fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    records_from_csv_str(&content)
}

/// Parse CSV content. The header row must contain a
/// `socialSecurityNumber` column; an `_id` column is optional.
pub fn records_from_csv_str(content: &str) -> Result<Vec<EncryptedRecord>, SourceError> {
    let mut rows = parse_csv(content).into_iter();
    let header = rows.next().ok_or(SourceError::EmptyCsv)?;

    let ssn_col = header
        .iter()
        .position(|h| h.trim() == SSN_FIELD)
        .ok_or(SourceError::MissingColumn(SSN_FIELD))?;
    let id_col = header.iter().position(|h| h.trim() == ID_FIELD);

    let records = rows
        .map(|row| {
            let id = id_col
                .and_then(|c| row.get(c))
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            let payload = row
                .get(ssn_col)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            EncryptedRecord::new(id, payload)
        })
        .collect::<Vec<_>>();

    log::debug!("Parsed {} records from CSV", records.len());
    Ok(records)
}

/// Split CSV content into rows of fields, honoring double-quoted fields
/// with `""` escapes and commas/newlines inside quotes. Blank lines
/// between records are skipped.
fn parse_csv(content: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => {
                row.push(std::mem::take(&mut field));
                // A trailing comma still means an empty last field.
            }
            '\r' => {}
            '\n' => {
                if !field.is_empty() || !row.is_empty() {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}
