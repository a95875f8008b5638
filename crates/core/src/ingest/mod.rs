//! Input boundary: turns raw JSON rows into validated models.
//!
//! Shape errors (a document that is not an array) fail the whole call.
//! Individual bad rows are collected in [`IngestOutcome::rejected`] and logged,
//! so one malformed row never blanks a dashboard.

pub mod records;

use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::position::Position;
use crate::models::transaction::Transaction;
use records::{PositionRecord, TransactionRecord};

/// Rows that normalized cleanly, plus the reasons the rest did not.
#[derive(Debug, Default)]
pub struct IngestOutcome<T> {
    pub accepted: Vec<T>,
    pub rejected: Vec<CoreError>,
}

impl<T> IngestOutcome<T> {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Parse a JSON array of transaction rows.
pub fn parse_transactions_json(json: &str) -> Result<IngestOutcome<Transaction>, CoreError> {
    let rows = parse_array(json, "transactions")?;
    Ok(normalize_rows(rows, "transaction", TransactionRecord::normalize))
}

/// Parse a JSON array of position rows.
pub fn parse_positions_json(json: &str) -> Result<IngestOutcome<Position>, CoreError> {
    let rows = parse_array(json, "positions")?;
    Ok(normalize_rows(rows, "position", |record: PositionRecord, _| {
        Ok(record.normalize())
    }))
}

/// Normalize already-deserialized transaction records.
pub fn normalize_transactions(records: Vec<TransactionRecord>) -> IngestOutcome<Transaction> {
    collect(
        records.into_iter().enumerate().map(|(i, r)| r.normalize(i)),
        "transaction",
    )
}

/// Normalize already-deserialized position records. Every record is kept.
pub fn normalize_positions(records: Vec<PositionRecord>) -> Vec<Position> {
    records.into_iter().map(PositionRecord::normalize).collect()
}

fn parse_array(json: &str, what: &str) -> Result<Vec<Value>, CoreError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(rows) => Ok(rows),
        other => Err(CoreError::InvalidInput(format!(
            "{what} must be a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn normalize_rows<R, T>(
    rows: Vec<Value>,
    what: &str,
    normalize: impl Fn(R, usize) -> Result<T, CoreError>,
) -> IngestOutcome<T>
where
    R: DeserializeOwned,
{
    let results = rows.into_iter().enumerate().map(|(index, row)| {
        let record: R = serde_json::from_value(row).map_err(|e| CoreError::InvalidRecord {
            index,
            reason: e.to_string(),
        })?;
        normalize(record, index)
    });
    collect(results, what)
}

fn collect<T>(
    results: impl Iterator<Item = Result<T, CoreError>>,
    what: &str,
) -> IngestOutcome<T> {
    let mut outcome = IngestOutcome {
        accepted: Vec::new(),
        rejected: Vec::new(),
    };
    for result in results {
        match result {
            Ok(item) => outcome.accepted.push(item),
            Err(e) => {
                warn!("Skipping {what}: {e}");
                outcome.rejected.push(e);
            }
        }
    }
    outcome
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
