//! Money-weighted return solver.
//!
//! Newton-Raphson with a forward-difference derivative, falling back to
//! bisection inside a fixed bracket when Newton stalls or leaves it.

use chrono::NaiveDate;
use log::warn;

use crate::models::settings::IrrSolverConfig;

const DAYS_PER_YEAR: f64 = 365.0;

/// A dated cash flow from the investor's point of view: money put in is
/// negative, money taken out (including the terminal value) is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: f64,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}

/// Net present value of `flows` at annual `rate`, discounting each flow by
/// its distance in years from the earliest flow.
pub fn npv(flows: &[CashFlow], rate: f64) -> f64 {
    let Some(origin) = flows.iter().map(|f| f.date).min() else {
        return 0.0;
    };
    flows
        .iter()
        .map(|f| {
            let years = (f.date - origin).num_days() as f64 / DAYS_PER_YEAR;
            f.amount / (1.0 + rate).powf(years)
        })
        .sum()
}

/// Solve for the annual rate at which `npv(flows, rate)` is zero.
///
/// Returns `None` when the flows cannot have a root (fewer than two flows, or
/// all flows on one side of zero) or when the bracket holds no sign change.
pub fn solve_irr(flows: &[CashFlow], config: &IrrSolverConfig) -> Option<f64> {
    if flows.len() < 2 {
        return None;
    }
    let has_inflow = flows.iter().any(|f| f.amount > 0.0);
    let has_outflow = flows.iter().any(|f| f.amount < 0.0);
    if !has_inflow || !has_outflow {
        return None;
    }

    newton(flows, config).or_else(|| bisection(flows, config))
}

fn newton(flows: &[CashFlow], config: &IrrSolverConfig) -> Option<f64> {
    let h = config.derivative_step;
    let mut rate = config.initial_guess;

    for _ in 0..config.max_iterations {
        let value = npv(flows, rate);
        if !value.is_finite() {
            return None;
        }
        if value.abs() < config.tolerance {
            return Some(rate);
        }

        let derivative = (npv(flows, rate + h) - value) / h;
        if !derivative.is_finite() || derivative.abs() < f64::EPSILON {
            return None;
        }

        let next = rate - value / derivative;
        if !next.is_finite() || next < config.lower_bound || next > config.upper_bound {
            return None;
        }
        rate = next;
    }
    None
}

fn bisection(flows: &[CashFlow], config: &IrrSolverConfig) -> Option<f64> {
    let mut lo = config.lower_bound;
    let mut hi = config.upper_bound;
    let mut f_lo = npv(flows, lo);
    let f_hi = npv(flows, hi);

    if !f_lo.is_finite() || !f_hi.is_finite() || f_lo.signum() == f_hi.signum() {
        warn!(
            "IRR: no sign change in [{lo}, {hi}] (npv {f_lo:.2} .. {f_hi:.2}); giving up"
        );
        return None;
    }

    let mut mid = (lo + hi) / 2.0;
    for _ in 0..config.max_iterations {
        mid = (lo + hi) / 2.0;
        let f_mid = npv(flows, mid);
        if f_mid.abs() < config.tolerance {
            return Some(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    warn!("IRR: bisection hit {} iterations, using {mid}", config.max_iterations);
    Some(mid)
}
