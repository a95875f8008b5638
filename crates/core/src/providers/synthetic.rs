use chrono::NaiveDate;

use super::traits::{window_dates, HistoricalValuationProvider};
use crate::models::ledger::CashLedgerEntry;
use crate::models::position::Position;
use crate::models::valuation::{build_series, DailyValuation};

/// Lowest fraction of today's market value the synthetic curve may reach.
const FACTOR_FLOOR: f64 = 0.85;

/// Placeholder history for portfolios without stored valuations.
///
/// Scales today's market value by `1 - i*0.001 + sin(i*0.15)*0.015` (floored
/// at 0.85), where `i` is the number of days before `today`. Cash is held at
/// today's balance. The curve is deterministic for a given `today`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticValuationProvider;

impl SyntheticValuationProvider {
    pub fn new() -> Self {
        Self
    }

    /// Scale factor applied `days_back` days before today.
    pub fn factor(days_back: u32) -> f64 {
        let i = f64::from(days_back);
        (1.0 - i * 0.001 + (i * 0.15).sin() * 0.015).max(FACTOR_FLOOR)
    }
}

impl HistoricalValuationProvider for SyntheticValuationProvider {
    fn name(&self) -> &str {
        "Synthetic"
    }

    fn daily_valuations(
        &self,
        positions: &[Position],
        ledger: &[CashLedgerEntry],
        days: u32,
        today: NaiveDate,
    ) -> Vec<DailyValuation> {
        // Nothing to value
        if positions.is_empty() && ledger.is_empty() {
            return Vec::new();
        }

        let market_value = positions.iter().fold(0.0, |acc, p| acc + p.market_value);
        let cash = ledger.last().map(|e| e.running_balance).unwrap_or(0.0);

        let dates = window_dates(days, today);
        let points = dates
            .into_iter()
            .map(|date| {
                let days_back = (today - date).num_days().max(0) as u32;
                (date, market_value * Self::factor(days_back), cash)
            })
            .collect();

        build_series(points)
    }
}
