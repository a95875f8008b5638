use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::position::Position;
use crate::models::transaction::{Transaction, TransactionType};

/// A transaction row as it arrives from the data layer.
///
/// Numbers may be JSON numbers, numeric strings, null or missing. Dates may be
/// `YYYY-MM-DD` or full RFC 3339 timestamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionRecord {
    /// Opaque id: any string or number
    pub id: Option<Value>,
    pub portfolio_id: Option<Value>,
    /// Older rows only carry `security_name`
    #[serde(alias = "security_name")]
    pub security_id: Option<String>,
    pub transaction_type: Option<String>,
    pub quantity: Option<Value>,
    pub price: Option<Value>,
    pub total_amount: Option<Value>,
    pub trade_date: Option<String>,
    pub settlement_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
}

/// A position row as it arrives from the data layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionRecord {
    pub portfolio_id: Option<Value>,
    #[serde(alias = "security_name")]
    pub security_id: Option<String>,
    pub quantity: Option<Value>,
    pub average_cost: Option<Value>,
    pub current_price: Option<Value>,
    pub market_value: Option<Value>,
}

impl TransactionRecord {
    /// Validate and convert into a [`Transaction`].
    ///
    /// Numeric fields never fail: anything missing or non-numeric becomes 0.
    /// Ids are opaque strings; a row without an `id` gets a generated one.
    /// The row is rejected only when its trade date is missing or unparsable.
    pub fn normalize(self, index: usize) -> Result<Transaction, CoreError> {
        let reject = |reason: String| CoreError::InvalidRecord { index, reason };

        let trade_date = match self.trade_date.as_deref() {
            Some(raw) => parse_date(raw)
                .ok_or_else(|| reject(format!("unparsable trade_date '{raw}'")))?,
            None => return Err(reject("missing trade_date".into())),
        };

        Ok(Transaction {
            id: id_string(self.id.as_ref()).unwrap_or_else(|| Uuid::new_v4().to_string()),
            portfolio_id: id_string(self.portfolio_id.as_ref()).unwrap_or_default(),
            security_id: self.security_id.unwrap_or_default(),
            transaction_type: TransactionType::from(
                self.transaction_type.as_deref().unwrap_or(""),
            ),
            quantity: coerce_number(self.quantity.as_ref()),
            price: coerce_number(self.price.as_ref()),
            total_amount: coerce_number(self.total_amount.as_ref()),
            trade_date,
            settlement_date: self.settlement_date.as_deref().and_then(parse_date),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            created_at: self.created_at.as_deref().and_then(parse_datetime),
        })
    }
}

impl PositionRecord {
    /// Convert into a [`Position`]. Never fails.
    ///
    /// A missing market value is derived as `quantity × current_price`.
    pub fn normalize(self) -> Position {
        let quantity = coerce_number(self.quantity.as_ref());
        let current_price = coerce_number(self.current_price.as_ref());
        let market_value = match self.market_value.as_ref() {
            Some(v) if !v.is_null() => coerce_number(Some(v)),
            _ => quantity * current_price,
        };

        Position {
            portfolio_id: id_string(self.portfolio_id.as_ref()).unwrap_or_default(),
            security_id: self.security_id.unwrap_or_default(),
            quantity,
            average_cost: coerce_number(self.average_cost.as_ref()),
            current_price,
            market_value,
        }
    }
}

/// Read a loosely-typed JSON number. Missing, null, non-numeric and
/// non-finite values all become 0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Parse `YYYY-MM-DD`, or take the date part of an RFC 3339 / ISO timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    parse_datetime(raw).map(|dt| dt.date())
}

/// Parse an RFC 3339 timestamp (converted to UTC) or a naive ISO timestamp.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Read an opaque id from a JSON string or number. `None` when missing,
/// blank or of any other JSON type.
pub fn id_string(value: Option<&Value>) -> Option<String> {
    let raw = match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return None,
    };
    (!raw.is_empty()).then_some(raw)
}
