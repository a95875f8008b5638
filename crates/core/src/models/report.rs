use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::accrual::AccrualEntry;
use super::corporate_action::CorporateActionEntry;
use super::ledger::CashLedgerEntry;
use super::performance::PerformanceMetrics;
use super::valuation::DailyValuation;
use crate::errors::CoreError;

/// Everything the accounting pipeline derives for one portfolio (or for all
/// rows when no portfolio filter was given).
///
/// A report is a pure function of its inputs and the valuation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingReport {
    /// Date the report was computed for
    pub as_of_date: NaiveDate,

    /// Portfolio filter applied, if any
    pub portfolio_id: Option<String>,

    /// Cash ledger, oldest first
    pub cash_ledger: Vec<CashLedgerEntry>,

    /// Corporate actions, newest first
    pub corporate_actions: Vec<CorporateActionEntry>,

    pub accruals: Vec<AccrualEntry>,

    /// Daily valuations, oldest first
    pub daily_valuations: Vec<DailyValuation>,

    pub performance: PerformanceMetrics,

    /// Running balance of the last ledger entry (0 for an empty ledger)
    pub current_cash_balance: f64,

    /// Sum of position market values plus current cash
    pub total_portfolio_value: f64,

    /// Sum of dividend and accrual ledger entries
    pub total_income_received: f64,

    /// Sum of absolute fee entries
    pub total_fees_deducted: f64,

    /// Sum of absolute buy outflows
    pub total_invested: f64,
}

impl AccountingReport {
    /// Serialize the report as pretty JSON for the dashboard.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize report: {e}")))
    }
}
