use log::debug;

use crate::models::ledger::{CashLedgerEntry, CashLedgerEntryType};
use crate::models::performance::PerformanceMetrics;
use crate::models::settings::{AccountingSettings, IrrSolverConfig};
use crate::models::valuation::DailyValuation;
use crate::services::irr_solver::{solve_irr, CashFlow};
use crate::services::rounding::{round_currency, round_pct};

const DAYS_PER_YEAR: f64 = 365.0;

/// Derives return and risk metrics from a daily valuation series and the
/// cash ledger.
///
/// - TWR: geometric chain of daily total-value ratios, annualized over the window
/// - IRR: money-weighted, solved numerically (see `irr_solver`)
/// - Volatility: sample std-dev of daily returns, annualized
/// - Sharpe: (annualized TWR - risk-free) / volatility
/// - Max drawdown: largest fall from a running peak of total value
pub struct PerformanceService {
    benchmark_return_pct: f64,
    risk_free_rate_pct: f64,
    trading_days_per_year: u32,
    irr_config: IrrSolverConfig,
}

impl PerformanceService {
    pub fn new(settings: &AccountingSettings) -> Self {
        Self {
            benchmark_return_pct: settings.benchmark_return_pct,
            risk_free_rate_pct: settings.risk_free_rate_pct,
            trading_days_per_year: settings.trading_days_per_year,
            irr_config: settings.irr.clone(),
        }
    }

    /// Compute metrics for `valuations` (oldest first).
    ///
    /// Fewer than two points yields all-zero metrics. `total_invested` is the
    /// capital put into buys; with none invested and no deposits there is no
    /// money-weighted return to solve for.
    pub fn compute_performance(
        &self,
        valuations: &[DailyValuation],
        ledger: &[CashLedgerEntry],
        total_invested: f64,
    ) -> PerformanceMetrics {
        let (Some(first), Some(last)) = (valuations.first(), valuations.last()) else {
            return PerformanceMetrics::zero();
        };
        if valuations.len() < 2 {
            debug!("Performance: {} valuation point(s), returning zero metrics", valuations.len());
            return PerformanceMetrics::zero();
        }

        let start_value = first.total_value;
        let end_value = last.total_value;
        let total_return = end_value - start_value;
        let total_return_pct = if start_value > 0.0 {
            total_return / start_value * 100.0
        } else {
            0.0
        };

        // ── Time-weighted return ─────────────────────────────────────
        let daily_returns = Self::daily_returns(valuations);
        let growth: f64 = daily_returns.iter().map(|r| 1.0 + r).product();
        let twr_period = (growth - 1.0) * 100.0;

        let period_days = match (last.date - first.date).num_days() {
            d if d > 0 => d as f64,
            _ => (valuations.len() - 1) as f64,
        };
        let twr = if growth > 0.0 {
            (growth.powf(DAYS_PER_YEAR / period_days) - 1.0) * 100.0
        } else {
            -100.0
        };

        // ── Money-weighted return ────────────────────────────────────
        let irr = self.money_weighted_return(ledger, last, total_invested);

        // ── Risk ─────────────────────────────────────────────────────
        let volatility = self.annualized_volatility(&daily_returns);
        let sharpe_ratio = if volatility > 0.0 {
            (twr - self.risk_free_rate_pct) / volatility
        } else {
            0.0
        };
        let (max_drawdown, max_drawdown_pct) = Self::max_drawdown(valuations);

        PerformanceMetrics {
            twr: round_pct(twr),
            twr_period: round_pct(twr_period),
            irr: round_pct(irr),
            total_return: round_currency(total_return),
            total_return_pct: round_pct(total_return_pct),
            benchmark_return: round_pct(self.benchmark_return_pct),
            alpha: round_pct(twr - self.benchmark_return_pct),
            sharpe_ratio: round_pct(sharpe_ratio),
            max_drawdown: round_currency(max_drawdown),
            max_drawdown_pct: round_pct(max_drawdown_pct),
            volatility: round_pct(volatility),
        }
    }

    /// Day-over-day returns, skipping days whose previous total is not positive.
    fn daily_returns(valuations: &[DailyValuation]) -> Vec<f64> {
        valuations
            .windows(2)
            .filter(|w| w[0].total_value > 0.0)
            .map(|w| w[1].total_value / w[0].total_value - 1.0)
            .collect()
    }

    fn annualized_volatility(&self, daily_returns: &[f64]) -> f64 {
        if daily_returns.len() < 2 {
            return 0.0;
        }
        let n = daily_returns.len() as f64;
        let mean = daily_returns.iter().sum::<f64>() / n;
        let variance = daily_returns
            .iter()
            .map(|r| (r - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);

        variance.sqrt() * f64::from(self.trading_days_per_year).sqrt() * 100.0
    }

    /// Largest peak-to-trough fall in total value, as an amount and as a
    /// percent of the peak. The two maxima are tracked independently.
    fn max_drawdown(valuations: &[DailyValuation]) -> (f64, f64) {
        let mut peak = f64::MIN;
        let mut max_amount = 0.0_f64;
        let mut max_pct = 0.0_f64;

        for v in valuations {
            peak = peak.max(v.total_value);
            let drawdown = peak - v.total_value;
            max_amount = max_amount.max(drawdown);
            if peak > 0.0 {
                max_pct = max_pct.max(drawdown / peak * 100.0);
            }
        }
        (max_amount, max_pct)
    }

    /// Annual IRR in percent, 0 when it cannot be solved.
    fn money_weighted_return(
        &self,
        ledger: &[CashLedgerEntry],
        terminal: &DailyValuation,
        total_invested: f64,
    ) -> f64 {
        let mut flows: Vec<CashFlow> = ledger
            .iter()
            .filter_map(|e| match e.entry_type {
                CashLedgerEntryType::BuyOutflow | CashLedgerEntryType::Deposit => {
                    Some(CashFlow::new(e.date, -e.amount.abs()))
                }
                CashLedgerEntryType::SellProceeds | CashLedgerEntryType::Withdrawal => {
                    Some(CashFlow::new(e.date, e.amount.abs()))
                }
                _ => None,
            })
            .collect();

        let has_deposits = flows.iter().any(|f| f.amount < 0.0);
        if total_invested <= 0.0 && !has_deposits {
            debug!("IRR: no invested capital, skipping");
            return 0.0;
        }

        flows.push(CashFlow::new(terminal.date, terminal.total_value));

        match solve_irr(&flows, &self.irr_config) {
            Some(rate) => rate * 100.0,
            None => {
                debug!("IRR: no solution for {} cash flows", flows.len());
                0.0
            }
        }
    }
}

impl Default for PerformanceService {
    fn default() -> Self {
        Self::new(&AccountingSettings::default())
    }
}
