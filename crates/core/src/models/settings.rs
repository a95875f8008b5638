use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Maximum valuation window in days (10 years).
pub const MAX_VALUATION_DAYS: u32 = 3650;

/// Tuning for the IRR root finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrSolverConfig {
    pub max_iterations: u32,

    /// Converged once |NPV| falls below this
    pub tolerance: f64,

    /// Forward-difference step for the NPV derivative
    pub derivative_step: f64,

    /// Bisection bracket (as a rate, -0.5 = -50%)
    pub lower_bound: f64,

    pub upper_bound: f64,

    pub initial_guess: f64,
}

impl Default for IrrSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 0.01,
            derivative_step: 0.0001,
            lower_bound: -0.5,
            upper_bound: 5.0,
            initial_guess: 0.1,
        }
    }
}

/// Engine configuration. Every field has a default, so `{}` is a valid
/// settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountingSettings {
    /// Length of the daily valuation window
    pub valuation_days: u32,

    /// Assumed dividend payment cycle used to scale accruals
    pub accrual_cycle_days: u32,

    /// Months added to the last dividend date to project the next payment
    pub accrual_cycle_months: u32,

    /// Flat annual benchmark return (%)
    pub benchmark_return_pct: f64,

    /// Annual risk-free rate used by the Sharpe ratio (%)
    pub risk_free_rate_pct: f64,

    pub trading_days_per_year: u32,

    pub irr: IrrSolverConfig,
}

impl Default for AccountingSettings {
    fn default() -> Self {
        Self {
            valuation_days: 90,
            accrual_cycle_days: 90,
            accrual_cycle_months: 3,
            benchmark_return_pct: 10.0,
            risk_free_rate_pct: 6.0,
            trading_days_per_year: 252,
            irr: IrrSolverConfig::default(),
        }
    }
}

impl AccountingSettings {
    /// Parse settings from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: AccountingSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write settings as pretty JSON (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.valuation_days > MAX_VALUATION_DAYS {
            return Err(CoreError::ValidationError(format!(
                "valuation_days of {} exceeds maximum of {MAX_VALUATION_DAYS} days (10 years)",
                self.valuation_days
            )));
        }
        if self.accrual_cycle_days == 0 {
            return Err(CoreError::ValidationError(
                "accrual_cycle_days must be positive".into(),
            ));
        }
        if self.trading_days_per_year == 0 {
            return Err(CoreError::ValidationError(
                "trading_days_per_year must be positive".into(),
            ));
        }
        if !self.benchmark_return_pct.is_finite() || !self.risk_free_rate_pct.is_finite() {
            return Err(CoreError::ValidationError(
                "benchmark_return_pct and risk_free_rate_pct must be finite".into(),
            ));
        }

        let irr = &self.irr;
        if irr.max_iterations == 0 {
            return Err(CoreError::ValidationError(
                "irr.max_iterations must be positive".into(),
            ));
        }
        if !is_positive(irr.tolerance) || !is_positive(irr.derivative_step) {
            return Err(CoreError::ValidationError(
                "irr.tolerance and irr.derivative_step must be positive".into(),
            ));
        }
        let bracket_ok = irr.lower_bound.is_finite()
            && irr.upper_bound.is_finite()
            && irr.lower_bound > -1.0
            && irr.lower_bound < irr.upper_bound;
        if !bracket_ok {
            return Err(CoreError::ValidationError(format!(
                "irr bracket [{}, {}] is invalid: need -1 < lower < upper",
                irr.lower_bound, irr.upper_bound
            )));
        }
        Ok(())
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
