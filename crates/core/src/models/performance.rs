use serde::{Deserialize, Serialize};

/// Return and risk figures for one valuation window.
///
/// Percentages are rounded to 2 decimals, currency amounts to whole units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Annualized, chain-linked time-weighted return (%)
    pub twr: f64,

    /// Time-weighted return over the window, not annualized (%)
    pub twr_period: f64,

    /// Money-weighted internal rate of return (%)
    pub irr: f64,

    /// End total value minus start total value
    pub total_return: f64,

    pub total_return_pct: f64,

    /// Assumed benchmark return (%)
    pub benchmark_return: f64,

    /// `twr - benchmark_return`
    pub alpha: f64,

    pub sharpe_ratio: f64,

    /// Largest peak-to-trough decline in total value
    pub max_drawdown: f64,

    pub max_drawdown_pct: f64,

    /// Annualized volatility of daily returns (%)
    pub volatility: f64,
}

impl PerformanceMetrics {
    /// All-zero metrics, returned when there is not enough data.
    pub fn zero() -> Self {
        Self::default()
    }
}
