use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of a trade or cash event.
///
/// Parsing is case-insensitive; unknown types are kept verbatim in `Other`
/// so the ledger can still describe them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Buy,
    Sell,
    Dividend,
    Fee,
    /// Cash moving in or out; direction comes from the sign of the amount
    Transfer,
    Split,
    Bonus,
    Merger,
    Other(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Buy => "buy",
            TransactionType::Sell => "sell",
            TransactionType::Dividend => "dividend",
            TransactionType::Fee => "fee",
            TransactionType::Transfer => "transfer",
            TransactionType::Split => "split",
            TransactionType::Bonus => "bonus",
            TransactionType::Merger => "merger",
            TransactionType::Other(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for TransactionType {
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "buy" => TransactionType::Buy,
            "sell" => TransactionType::Sell,
            "dividend" => TransactionType::Dividend,
            "fee" => TransactionType::Fee,
            "transfer" => TransactionType::Transfer,
            "split" => TransactionType::Split,
            "bonus" => TransactionType::Bonus,
            "merger" => TransactionType::Merger,
            _ => TransactionType::Other(raw.trim().to_string()),
        }
    }
}

impl From<String> for TransactionType {
    fn from(raw: String) -> Self {
        TransactionType::from(raw.as_str())
    }
}

impl From<TransactionType> for String {
    fn from(t: TransactionType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single trade or cash event, already normalized.
///
/// Transactions are owned by the trading subsystem. The engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque identifier from the data layer
    pub id: String,

    /// Opaque portfolio key, compared verbatim when filtering
    pub portfolio_id: String,

    /// Security identifier or display name (e.g., "AAPL", "HDFC Bank")
    pub security_id: String,

    pub transaction_type: TransactionType,

    /// Units traded. For splits: additional shares received.
    pub quantity: f64,

    /// Price per unit. For splits: the split ratio.
    pub price: f64,

    /// Total cash value of the event. For transfers the sign carries direction.
    pub total_amount: f64,

    pub trade_date: NaiveDate,

    #[serde(default)]
    pub settlement_date: Option<NaiveDate>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Transaction {
    /// New transaction with a freshly generated id.
    pub fn new(
        portfolio_id: impl Into<String>,
        security_id: impl Into<String>,
        transaction_type: TransactionType,
        quantity: f64,
        price: f64,
        total_amount: f64,
        trade_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            portfolio_id: portfolio_id.into(),
            security_id: security_id.into(),
            transaction_type,
            quantity,
            price,
            total_amount,
            trade_date,
            settlement_date: None,
            notes: None,
            created_at: None,
        }
    }

    /// Attach free-text notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_settlement_date(mut self, date: NaiveDate) -> Self {
        self.settlement_date = Some(date);
        self
    }

    /// Lowercased notes, empty when absent. Used for keyword classification.
    pub fn notes_lower(&self) -> String {
        self.notes.as_deref().unwrap_or("").to_lowercase()
    }
}
