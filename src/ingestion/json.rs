//! JSON roster ingestion.
//!
//! Supported inputs:
//! - A JSON array of model objects: `[{"username":"a", ...}, ...]`
//! - A single model object
//! - An envelope with a `models` array: `{"generatedAt": "...", "models": [...]}`
//! - Newline-delimited JSON (NDJSON), one model object per line
//!
//! Every record must fully satisfy the model schema; otherwise ingestion fails with
//! [`RosterError::InvalidRecord`] naming the 1-based row.

use std::fs;
use std::path::Path;

use crate::error::{RosterError, RosterResult};
use crate::types::{ModelRecord, Pricing, Roster};

/// Ingest a JSON or NDJSON file into a [`Roster`].
pub fn ingest_roster_from_path(path: impl AsRef<Path>) -> RosterResult<Roster> {
    let text = fs::read_to_string(path)?;
    ingest_roster_from_str(&text)
}

/// Ingest JSON from an in-memory string into a [`Roster`].
pub fn ingest_roster_from_str(input: &str) -> RosterResult<Roster> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(RosterError::InvalidRecord {
            row: 0,
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array, envelope, or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => records_from_values(numbered(items)),
            serde_json::Value::Object(mut obj) => match obj.remove("models") {
                Some(serde_json::Value::Array(items)) => records_from_values(numbered(items)),
                Some(_) => Err(RosterError::InvalidRecord {
                    row: 0,
                    message: "'models' must be an array".to_string(),
                }),
                None => records_from_values([(1, serde_json::Value::Object(obj))]),
            },
            _ => Err(RosterError::InvalidRecord {
                row: 0,
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        ingest_ndjson_from_str(input)
    }
}

/// Ingest newline-delimited JSON, one model object per line. Blank lines are skipped.
///
/// Error rows are physical line numbers, blank lines included.
pub fn ingest_ndjson_from_str(input: &str) -> RosterResult<Roster> {
    let mut values = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = i + 1;
        let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| RosterError::InvalidRecord {
            row,
            message: format!("invalid ndjson: {e}"),
        })?;
        values.push((row, v));
    }
    records_from_values(values)
}

/// Pair array elements with their 1-based position.
fn numbered(items: Vec<serde_json::Value>) -> impl Iterator<Item = (usize, serde_json::Value)> {
    items.into_iter().enumerate().map(|(i, v)| (i + 1, v))
}

fn records_from_values<I>(values: I) -> RosterResult<Roster>
where
    I: IntoIterator<Item = (usize, serde_json::Value)>,
{
    let mut records = Vec::new();
    for (row, v) in values {
        if !v.is_object() {
            return Err(RosterError::InvalidRecord {
                row,
                message: "not a json object".to_string(),
            });
        }
        let record: ModelRecord = serde_json::from_value(v).map_err(|e| RosterError::InvalidRecord {
            row,
            message: e.to_string(),
        })?;
        records.push(normalize(row, record)?);
    }
    Roster::try_new(records)
}

/// Fill the rate from the `pvt` label when only the label is present, and enforce record
/// invariants the schema alone cannot express.
fn normalize(row: usize, mut record: ModelRecord) -> RosterResult<ModelRecord> {
    if record.username.trim().is_empty() {
        return Err(RosterError::InvalidRecord {
            row,
            message: "username is empty".to_string(),
        });
    }

    if record.pricing.rate.is_none() {
        if let Some((rate, minimum)) = record.pricing.label.as_deref().and_then(Pricing::parse_label) {
            record.pricing.rate = Some(rate);
            if record.pricing.minimum.is_none() {
                record.pricing.minimum = minimum;
            }
        }
    }

    if let Some(rate) = record.pricing.rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(RosterError::InvalidRecord {
                row,
                message: format!("pvt_rate must be a non-negative number, got {rate}"),
            });
        }
        // -0.0 passes the check above; store it as 0.0.
        record.pricing.rate = Some(rate + 0.0);
    }

    Ok(record)
}
