use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccrualStatus {
    /// Part of the payment cycle has elapsed
    Accruing,
    /// The full cycle has elapsed; the next payment is due
    Received,
}

/// Dividend income accrued on one holding since its last payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccrualEntry {
    pub security_id: String,

    /// Units currently held
    pub quantity: f64,

    pub last_dividend_date: NaiveDate,

    /// Mean of all historical dividend payments for this security
    pub average_dividend: f64,

    pub days_since_last_dividend: i64,

    /// Elapsed share of the payment cycle, in [0, 1]
    pub accrual_fraction: f64,

    pub accrued_amount: f64,

    /// Projected end of the current payment cycle
    pub expected_payment_date: NaiveDate,

    pub status: AccrualStatus,
}
