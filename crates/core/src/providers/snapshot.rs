use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::traits::{window_dates, HistoricalValuationProvider};
use crate::models::ledger::{balance_as_of, CashLedgerEntry};
use crate::models::position::Position;
use crate::models::valuation::{build_series, DailyValuation};

/// Valuations from recorded point-in-time portfolio values.
///
/// Each day takes the latest snapshot on or before it (carrying the last
/// known value over weekends and holidays) and the ledger balance at the end
/// of that day. Days before the first snapshot value the holdings at 0.
/// Today's value comes from the current positions when positions are given
/// and no snapshot exists for today. Otherwise the last snapshot carries
/// forward into today too.
#[derive(Debug, Clone, Default)]
pub struct SnapshotValuationProvider {
    snapshots: BTreeMap<NaiveDate, f64>,
}

impl SnapshotValuationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(date, market value)` pairs. Later duplicates win.
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        Self {
            snapshots: snapshots.into_iter().collect(),
        }
    }

    /// Record (or overwrite) the market value for `date`.
    pub fn record(&mut self, date: NaiveDate, market_value: f64) {
        self.snapshots.insert(date, market_value);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.snapshots.range(..=date).next_back().map(|(_, v)| *v)
    }
}

impl HistoricalValuationProvider for SnapshotValuationProvider {
    fn name(&self) -> &str {
        "Snapshot"
    }

    fn daily_valuations(
        &self,
        positions: &[Position],
        ledger: &[CashLedgerEntry],
        days: u32,
        today: NaiveDate,
    ) -> Vec<DailyValuation> {
        if self.snapshots.is_empty() && positions.is_empty() && ledger.is_empty() {
            return Vec::new();
        }

        let current_value = positions.iter().fold(0.0, |acc, p| acc + p.market_value);
        let live_today = !positions.is_empty() && !self.snapshots.contains_key(&today);

        let points = window_dates(days, today)
            .into_iter()
            .map(|date| {
                let portfolio_value = if date == today && live_today {
                    current_value
                } else {
                    self.value_on(date).unwrap_or(0.0)
                };
                (date, portfolio_value, balance_as_of(ledger, date))
            })
            .collect();

        build_series(points)
    }
}
