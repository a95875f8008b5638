use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorporateActionType {
    Dividend,
    Split,
    Bonus,
    Merger,
}

impl std::fmt::Display for CorporateActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorporateActionType::Dividend => write!(f, "dividend"),
            CorporateActionType::Split => write!(f, "split"),
            CorporateActionType::Bonus => write!(f, "bonus"),
            CorporateActionType::Merger => write!(f, "merger"),
        }
    }
}

/// A dividend, split, bonus issue or merger reclassified from a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporateActionEntry {
    pub transaction_id: String,

    pub date: NaiveDate,

    pub action_type: CorporateActionType,

    pub security_id: String,

    pub description: String,

    /// Cash received (positive) or paid
    pub cash_impact: f64,

    /// Change in units held
    pub quantity_impact: f64,

    /// Per-unit price change in percent (negative for splits)
    pub price_adjustment_pct: f64,
}
