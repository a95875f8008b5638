use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::rounding::{round_currency, round_pct};

/// Portfolio and cash value at the end of one day.
///
/// `total_value == portfolio_value + cash_balance` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyValuation {
    pub date: NaiveDate,

    pub portfolio_value: f64,

    pub cash_balance: f64,

    pub total_value: f64,

    /// Change in total value since the previous point (0 for the first point)
    pub day_change: f64,

    /// `day_change` as a percent of the previous total, 0 when that total is ≤ 0
    pub day_change_pct: f64,
}

/// Assemble an ordered series from `(date, portfolio_value, cash_balance)`
/// points, filling in totals and day-over-day changes.
///
/// Points must already be oldest first.
pub fn build_series(points: Vec<(NaiveDate, f64, f64)>) -> Vec<DailyValuation> {
    let mut series: Vec<DailyValuation> = Vec::with_capacity(points.len());
    let mut prev_total: Option<f64> = None;

    for (date, portfolio_value, cash_balance) in points {
        let portfolio_value = round_currency(portfolio_value);
        let cash_balance = round_currency(cash_balance);
        let total_value = portfolio_value + cash_balance;

        let (day_change, day_change_pct) = match prev_total {
            Some(prev) => {
                let change = total_value - prev;
                let pct = if prev > 0.0 {
                    round_pct(change / prev * 100.0)
                } else {
                    0.0
                };
                (change, pct)
            }
            None => (0.0, 0.0),
        };

        series.push(DailyValuation {
            date,
            portfolio_value,
            cash_balance,
            total_value,
            day_change,
            day_change_pct,
        });
        prev_total = Some(total_value);
    }

    series
}
