use chrono::NaiveDate;
use log::debug;

use crate::models::ledger::{CashLedgerEntry, CashLedgerEntryType};
use crate::models::position::Position;
use crate::models::report::AccountingReport;
use crate::models::settings::AccountingSettings;
use crate::models::transaction::Transaction;
use crate::providers::traits::HistoricalValuationProvider;
use crate::services::accrual_service::AccrualService;
use crate::services::corporate_action_service::CorporateActionService;
use crate::services::ledger_service::LedgerService;
use crate::services::performance_service::PerformanceService;

/// Runs the accounting pipeline and aggregates the summary totals.
///
/// Order: ledger → corporate actions and accruals → daily valuations →
/// performance. Deterministic for identical inputs, provider and `today`.
pub struct ReportService {
    ledger_service: LedgerService,
    corporate_action_service: CorporateActionService,
    accrual_service: AccrualService,
    performance_service: PerformanceService,
    valuation_days: u32,
}

impl ReportService {
    pub fn new(settings: &AccountingSettings) -> Self {
        Self {
            ledger_service: LedgerService::new(),
            corporate_action_service: CorporateActionService::new(),
            accrual_service: AccrualService::new(
                settings.accrual_cycle_days,
                settings.accrual_cycle_months,
            ),
            performance_service: PerformanceService::new(settings),
            valuation_days: settings.valuation_days,
        }
    }

    /// Build the report for `portfolio_id` (or every row when `None`).
    pub fn compute_report(
        &self,
        transactions: &[Transaction],
        positions: &[Position],
        portfolio_id: Option<&str>,
        valuation_provider: &dyn HistoricalValuationProvider,
        today: NaiveDate,
    ) -> AccountingReport {
        let transactions: Vec<Transaction> = match portfolio_id {
            Some(pid) => transactions
                .iter()
                .filter(|t| t.portfolio_id == pid)
                .cloned()
                .collect(),
            None => transactions.to_vec(),
        };
        let positions: Vec<Position> = match portfolio_id {
            Some(pid) => positions
                .iter()
                .filter(|p| p.portfolio_id == pid)
                .cloned()
                .collect(),
            None => positions.to_vec(),
        };

        debug!(
            "Computing accounting report as of {today}: {} transactions, {} positions, valuations via {}",
            transactions.len(),
            positions.len(),
            valuation_provider.name()
        );

        // 1. Cash ledger
        let cash_ledger = self.ledger_service.build_ledger(&transactions);

        // 2. Corporate actions and accruals
        let corporate_actions = self.corporate_action_service.extract_actions(&transactions);
        let accruals = self
            .accrual_service
            .estimate_accruals(&transactions, &positions, today);

        // 3. Daily valuations
        let daily_valuations = valuation_provider.daily_valuations(
            &positions,
            &cash_ledger,
            self.valuation_days,
            today,
        );

        // 4. Performance
        let total_invested = Self::sum_abs(&cash_ledger, CashLedgerEntryType::BuyOutflow);
        let performance = self.performance_service.compute_performance(
            &daily_valuations,
            &cash_ledger,
            total_invested,
        );

        // 5. Totals
        let current_cash_balance = cash_ledger
            .last()
            .map(|e| e.running_balance)
            .unwrap_or(0.0);
        let market_value = sum(positions.iter().map(|p| p.market_value));
        let total_income_received = sum(
            cash_ledger
                .iter()
                .filter(|e| e.entry_type.is_income())
                .map(|e| e.amount),
        );
        let total_fees_deducted = Self::sum_abs(&cash_ledger, CashLedgerEntryType::Fee);

        AccountingReport {
            as_of_date: today,
            portfolio_id: portfolio_id.map(str::to_string),
            cash_ledger,
            corporate_actions,
            accruals,
            daily_valuations,
            performance,
            current_cash_balance,
            total_portfolio_value: market_value + current_cash_balance,
            total_income_received,
            total_fees_deducted,
            total_invested,
        }
    }

    fn sum_abs(ledger: &[CashLedgerEntry], entry_type: CashLedgerEntryType) -> f64 {
        sum(
            ledger
                .iter()
                .filter(|e| e.entry_type == entry_type)
                .map(|e| e.amount.abs()),
        )
    }
}

/// Sum starting from +0.0, so an empty total never comes out as -0.0.
fn sum(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, v| acc + v)
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new(&AccountingSettings::default())
    }
}
