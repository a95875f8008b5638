pub mod errors;
pub mod ingest;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use models::{
    ledger::CashLedgerEntry, performance::PerformanceMetrics, position::Position,
    report::AccountingReport, settings::AccountingSettings, transaction::Transaction,
    valuation::DailyValuation,
};
use providers::{synthetic::SyntheticValuationProvider, traits::HistoricalValuationProvider};
use services::{performance_service::PerformanceService, report_service::ReportService};

use errors::CoreError;

/// Main entry point for the portfolio accounting engine.
///
/// Holds the settings, the pipeline services and the valuation history
/// provider. Computing a report never mutates the engine, so one engine can
/// serve many portfolios concurrently.
#[must_use]
pub struct AccountingEngine {
    settings: AccountingSettings,
    report_service: ReportService,
    performance_service: PerformanceService,
    valuation_provider: Box<dyn HistoricalValuationProvider>,
}

impl std::fmt::Debug for AccountingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountingEngine")
            .field("settings", &self.settings)
            .field("valuation_provider", &self.valuation_provider.name())
            .finish()
    }
}

impl AccountingEngine {
    /// Engine with default settings and synthetic valuation history.
    pub fn new() -> Self {
        Self::build(AccountingSettings::default())
    }

    /// Engine with custom settings. Settings are validated first.
    pub fn with_settings(settings: AccountingSettings) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self::build(settings))
    }

    /// Swap the valuation history source (e.g., for recorded snapshots).
    pub fn with_valuation_provider(
        mut self,
        provider: Box<dyn HistoricalValuationProvider>,
    ) -> Self {
        self.valuation_provider = provider;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &AccountingSettings {
        &self.settings
    }

    #[must_use]
    pub fn valuation_provider_name(&self) -> &str {
        self.valuation_provider.name()
    }

    // ── Reports ─────────────────────────────────────────────────────

    /// Compute the accounting report as of today (UTC).
    pub fn compute_report(
        &self,
        transactions: &[Transaction],
        positions: &[Position],
        portfolio_id: Option<&str>,
    ) -> AccountingReport {
        let today = chrono::Utc::now().date_naive();
        self.compute_report_as_of(transactions, positions, portfolio_id, today)
    }

    /// Compute the accounting report for an explicit valuation date.
    pub fn compute_report_as_of(
        &self,
        transactions: &[Transaction],
        positions: &[Position],
        portfolio_id: Option<&str>,
        today: NaiveDate,
    ) -> AccountingReport {
        self.report_service.compute_report(
            transactions,
            positions,
            portfolio_id,
            self.valuation_provider.as_ref(),
            today,
        )
    }

    /// Parse raw JSON arrays of transactions and positions, then compute the
    /// report. Fails only if either document is not a JSON array; bad rows
    /// are skipped and logged.
    pub fn compute_report_from_json(
        &self,
        transactions_json: &str,
        positions_json: &str,
        portfolio_id: Option<&str>,
        today: NaiveDate,
    ) -> Result<AccountingReport, CoreError> {
        let transactions = ingest::parse_transactions_json(transactions_json)?;
        let positions = ingest::parse_positions_json(positions_json)?;
        Ok(self.compute_report_as_of(
            &transactions.accepted,
            &positions.accepted,
            portfolio_id,
            today,
        ))
    }

    // ── Individual stages ───────────────────────────────────────────

    /// Performance metrics for an arbitrary valuation series.
    #[must_use]
    pub fn compute_performance(
        &self,
        valuations: &[DailyValuation],
        ledger: &[CashLedgerEntry],
        total_invested: f64,
    ) -> PerformanceMetrics {
        self.performance_service
            .compute_performance(valuations, ledger, total_invested)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(settings: AccountingSettings) -> Self {
        let report_service = ReportService::new(&settings);
        let performance_service = PerformanceService::new(&settings);

        Self {
            settings,
            report_service,
            performance_service,
            valuation_provider: Box::new(SyntheticValuationProvider::new()),
        }
    }
}

impl Default for AccountingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute an accounting report with default settings and synthetic
/// valuation history, as of today (UTC).
///
/// Both inputs are filtered to `portfolio_id` when one is given.
pub fn compute_accounting_report(
    transactions: &[Transaction],
    positions: &[Position],
    portfolio_id: Option<&str>,
) -> AccountingReport {
    AccountingEngine::new().compute_report(transactions, positions, portfolio_id)
}
