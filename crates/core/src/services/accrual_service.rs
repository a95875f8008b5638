use chrono::{Months, NaiveDate};
use log::debug;
use std::collections::{HashMap, HashSet};

use crate::models::accrual::{AccrualEntry, AccrualStatus};
use crate::models::position::Position;
use crate::models::transaction::{Transaction, TransactionType};
use crate::services::rounding::{round_cents, round_pct};

/// Dividend history of one security.
struct DividendHistory {
    total: f64,
    count: usize,
    last_date: NaiveDate,
}

/// Estimates dividend income accrued since the last payment on each holding.
///
/// Income is the average historical dividend scaled linearly over an assumed
/// payment cycle. Holdings without any dividend history are left out.
pub struct AccrualService {
    cycle_days: u32,
    cycle_months: u32,
}

impl AccrualService {
    pub fn new(cycle_days: u32, cycle_months: u32) -> Self {
        Self {
            cycle_days: cycle_days.max(1),
            cycle_months,
        }
    }

    /// One entry per held security with at least one dividend, in position order.
    pub fn estimate_accruals(
        &self,
        transactions: &[Transaction],
        positions: &[Position],
        today: NaiveDate,
    ) -> Vec<AccrualEntry> {
        let history = Self::dividend_history(transactions);
        let mut seen: HashSet<&str> = HashSet::new();
        let mut quantities: HashMap<&str, f64> = HashMap::new();

        for position in positions.iter().filter(|p| p.is_held()) {
            *quantities.entry(position.security_id.as_str()).or_insert(0.0) += position.quantity;
        }

        let accruals: Vec<AccrualEntry> = positions
            .iter()
            .filter(|p| p.is_held())
            .filter(|p| seen.insert(p.security_id.as_str()))
            .filter_map(|p| {
                let h = history.get(p.security_id.as_str())?;
                let quantity = quantities.get(p.security_id.as_str()).copied().unwrap_or(0.0);
                Some(self.accrue(&p.security_id, quantity, h, today))
            })
            .collect();

        debug!(
            "Estimated {} accruals across {} positions",
            accruals.len(),
            positions.len()
        );
        accruals
    }

    fn accrue(
        &self,
        security_id: &str,
        quantity: f64,
        history: &DividendHistory,
        today: NaiveDate,
    ) -> AccrualEntry {
        let average_dividend = history.total / history.count as f64;
        // A dividend dated after `today` means nothing has accrued yet
        let days_since = (today - history.last_date).num_days().max(0);
        let accrual_fraction = (days_since as f64 / f64::from(self.cycle_days)).min(1.0);

        let expected_payment_date = history
            .last_date
            .checked_add_months(Months::new(self.cycle_months))
            .unwrap_or(history.last_date);

        // Status follows the reported (rounded) fraction
        let status = if round_pct(accrual_fraction) >= 1.0 {
            AccrualStatus::Received
        } else {
            AccrualStatus::Accruing
        };

        AccrualEntry {
            security_id: security_id.to_string(),
            quantity,
            last_dividend_date: history.last_date,
            average_dividend: round_cents(average_dividend),
            days_since_last_dividend: days_since,
            accrual_fraction: round_pct(accrual_fraction),
            accrued_amount: round_cents(average_dividend * accrual_fraction),
            expected_payment_date,
            status,
        }
    }

    fn dividend_history(transactions: &[Transaction]) -> HashMap<&str, DividendHistory> {
        let mut history: HashMap<&str, DividendHistory> = HashMap::new();

        for tx in transactions
            .iter()
            .filter(|t| t.transaction_type == TransactionType::Dividend)
        {
            history
                .entry(tx.security_id.as_str())
                .and_modify(|h| {
                    h.total += tx.total_amount;
                    h.count += 1;
                    if tx.trade_date > h.last_date {
                        h.last_date = tx.trade_date;
                    }
                })
                .or_insert(DividendHistory {
                    total: tx.total_amount,
                    count: 1,
                    last_date: tx.trade_date,
                });
        }
        history
    }
}

impl Default for AccrualService {
    fn default() -> Self {
        Self::new(90, 3)
    }
}
