use chrono::NaiveDate;

use crate::models::ledger::CashLedgerEntry;
use crate::models::position::Position;
use crate::models::valuation::DailyValuation;

/// Source of the daily valuation series.
///
/// The synthetic implementation fakes history from today's totals. A provider
/// backed by real point-in-time valuations can replace it without touching the
/// performance calculator or the report.
pub trait HistoricalValuationProvider: Send + Sync {
    /// Human-readable name of this provider (for logs).
    fn name(&self) -> &str;

    /// One valuation per day for the `days` days ending at `today`, oldest first.
    ///
    /// `ledger` is in date-ascending order and supplies cash balances.
    fn daily_valuations(
        &self,
        positions: &[Position],
        ledger: &[CashLedgerEntry],
        days: u32,
        today: NaiveDate,
    ) -> Vec<DailyValuation>;
}

/// Dates of the `days`-long window ending at `today`, oldest first.
pub(crate) fn window_dates(days: u32, today: NaiveDate) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(chrono::Days::new(u64::from(back))))
        .collect()
}
