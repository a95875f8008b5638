// ═══════════════════════════════════════════════════════════════════
// Integration Tests — AccountingEngine end to end
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use portfolio_accounting_core::errors::CoreError;
use portfolio_accounting_core::models::accrual::AccrualStatus;
use portfolio_accounting_core::models::corporate_action::CorporateActionType;
use portfolio_accounting_core::models::ledger::CashLedgerEntryType;
use portfolio_accounting_core::models::performance::PerformanceMetrics;
use portfolio_accounting_core::models::position::Position;
use portfolio_accounting_core::models::settings::AccountingSettings;
use portfolio_accounting_core::models::transaction::{Transaction, TransactionType};
use portfolio_accounting_core::providers::snapshot::SnapshotValuationProvider;
use portfolio_accounting_core::{compute_accounting_report, AccountingEngine};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

const PID_A: &str = "7f1c2a4e-1d0b-4c55-9a57-0c4a3e6f8b21";
const PID_B: &str = "household-b";

/// Buy 10 AAPL @ 100, then a 50 dividend; AAPL now trades at 105.
fn buy_and_dividend(pid: &str) -> (Vec<Transaction>, Vec<Position>) {
    let transactions = vec![
        Transaction::new(pid, "AAPL", TransactionType::Buy, 10.0, 100.0, 1000.0, d(2024, 1, 15)),
        Transaction::new(pid, "AAPL", TransactionType::Dividend, 0.0, 0.0, 50.0, d(2024, 2, 14)),
    ];
    let positions = vec![Position::new(pid, "AAPL", 10.0, 100.0, 105.0)];
    (transactions, positions)
}

// ═══════════════════════════════════════════════════════════════════
//  Full pipeline
// ═══════════════════════════════════════════════════════════════════

mod pipeline {
    use super::*;

    #[test]
    fn buy_and_dividend_report() {
        let (txs, positions) = buy_and_dividend(PID_A);
        let report = AccountingEngine::new().compute_report_as_of(
            &txs,
            &positions,
            Some(PID_A),
            d(2024, 3, 1),
        );

        assert_eq!(report.as_of_date, d(2024, 3, 1));
        assert_eq!(report.portfolio_id.as_deref(), Some(PID_A));

        // Ledger
        assert_eq!(report.cash_ledger.len(), 2);
        assert_eq!(report.cash_ledger[0].amount, -1000.0);
        assert_eq!(report.cash_ledger[0].running_balance, -1000.0);
        assert_eq!(report.cash_ledger[1].entry_type, CashLedgerEntryType::Dividend);
        assert_eq!(report.cash_ledger[1].running_balance, -950.0);

        // Totals
        assert_eq!(report.current_cash_balance, -950.0);
        assert_eq!(report.total_portfolio_value, 100.0);
        assert_eq!(report.total_income_received, 50.0);
        assert_eq!(report.total_fees_deducted, 0.0);
        assert_eq!(report.total_invested, 1000.0);

        // Corporate actions
        assert_eq!(report.corporate_actions.len(), 1);
        assert_eq!(report.corporate_actions[0].action_type, CorporateActionType::Dividend);
        assert_eq!(report.corporate_actions[0].cash_impact, 50.0);

        // Accruals
        assert_eq!(report.accruals.len(), 1);
        let accrual = &report.accruals[0];
        assert_eq!(accrual.days_since_last_dividend, 16);
        assert_eq!(accrual.accrued_amount, 8.89);
        assert_eq!(accrual.expected_payment_date, d(2024, 5, 14));
        assert_eq!(accrual.status, AccrualStatus::Accruing);

        // Valuations
        assert_eq!(report.daily_valuations.len(), 90);
        let last = report.daily_valuations.last().unwrap();
        assert_eq!(last.date, d(2024, 3, 1));
        assert_eq!(last.total_value, 100.0);
    }

    #[test]
    fn empty_inputs_give_empty_report() {
        let report = compute_accounting_report(&[], &[], None);
        assert!(report.cash_ledger.is_empty());
        assert!(report.corporate_actions.is_empty());
        assert!(report.accruals.is_empty());
        assert!(report.daily_valuations.is_empty());
        assert_eq!(report.performance, PerformanceMetrics::zero());
        assert_eq!(report.current_cash_balance, 0.0);
        assert_eq!(report.total_portfolio_value, 0.0);
        assert_eq!(report.total_income_received, 0.0);
        assert_eq!(report.total_fees_deducted, 0.0);

        for total in [
            report.current_cash_balance,
            report.total_portfolio_value,
            report.total_income_received,
            report.total_fees_deducted,
            report.total_invested,
        ] {
            assert!(total.is_sign_positive());
        }
        assert!(!report.to_json().unwrap().contains("-0.0"));
    }

    #[test]
    fn ledger_is_ordered_with_consistent_balances() {
        let pid = PID_A;
        let txs = vec![
            Transaction::new(pid, "", TransactionType::Fee, 0.0, 0.0, 20.0, d(2024, 3, 1))
                .with_notes("Platform fee"),
            Transaction::new(pid, "", TransactionType::Transfer, 0.0, 0.0, 5000.0, d(2024, 1, 1))
                .with_notes("Initial deposit"),
            Transaction::new(pid, "MSFT", TransactionType::Buy, 5.0, 400.0, 2000.0, d(2024, 1, 10)),
            Transaction::new(pid, "MSFT", TransactionType::Sell, 2.0, 420.0, 840.0, d(2024, 2, 20)),
            Transaction::new(pid, "MSFT", TransactionType::Dividend, 0.0, 0.0, 15.0, d(2024, 2, 1)),
        ];
        let positions = vec![Position::new(pid, "MSFT", 3.0, 400.0, 430.0)];
        let report =
            AccountingEngine::new().compute_report_as_of(&txs, &positions, None, d(2024, 3, 31));

        let ledger = &report.cash_ledger;
        assert_eq!(ledger[0].running_balance, ledger[0].amount);
        for w in ledger.windows(2) {
            assert!(w[0].date <= w[1].date);
            assert_eq!(w[1].running_balance, w[0].running_balance + w[1].amount);
        }
        for e in ledger {
            match e.entry_type {
                CashLedgerEntryType::BuyOutflow => assert!(e.amount <= 0.0),
                CashLedgerEntryType::SellProceeds => assert!(e.amount >= 0.0),
                _ => {}
            }
        }

        assert_eq!(report.current_cash_balance, 3835.0);
        assert_eq!(report.total_portfolio_value, 3835.0 + 1290.0);
        assert_eq!(report.total_income_received, 15.0);
        assert_eq!(report.total_fees_deducted, 20.0);
    }

    #[test]
    fn valuation_and_performance_are_consistent() {
        let (txs, positions) = buy_and_dividend(PID_A);
        let report =
            AccountingEngine::new().compute_report_as_of(&txs, &positions, None, d(2024, 3, 1));

        let vals = &report.daily_valuations;
        for v in vals {
            assert_eq!(v.total_value, v.portfolio_value + v.cash_balance);
        }
        let first = vals.first().unwrap().total_value;
        let last = vals.last().unwrap().total_value;
        assert_eq!(report.performance.total_return, (last - first).round());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Portfolio filtering
// ═══════════════════════════════════════════════════════════════════

mod filtering {
    use super::*;

    #[test]
    fn other_portfolios_are_excluded() {
        let (mut txs, mut positions) = buy_and_dividend(PID_A);
        let (other_txs, other_positions) = buy_and_dividend(PID_B);
        txs.extend(other_txs);
        positions.extend(other_positions);

        let today = d(2024, 3, 1);
        let engine = AccountingEngine::new();
        let everything = engine.compute_report_as_of(&txs, &positions, None, today);
        let only_a = engine.compute_report_as_of(&txs, &positions, Some(PID_A), today);

        assert_eq!(everything.cash_ledger.len(), 4);
        assert_eq!(only_a.cash_ledger.len(), 2);
        assert_eq!(only_a.total_income_received, 50.0);
        assert_eq!(everything.total_income_received, 100.0);
    }

    #[test]
    fn filtering_pre_filtered_input_changes_nothing() {
        let (mut all_tx, mut all_pos) = buy_and_dividend(PID_A);
        let (b_tx, b_pos) = buy_and_dividend(PID_B);
        all_tx.extend(b_tx);
        all_pos.extend(b_pos);
        all_tx.push(Transaction::new(
            PID_B,
            "",
            TransactionType::Fee,
            0.0,
            0.0,
            25.0,
            d(2024, 2, 20),
        ));
        let today = d(2024, 3, 1);
        let engine = AccountingEngine::new();

        let only_a_tx: Vec<Transaction> =
            all_tx.iter().filter(|t| t.portfolio_id == PID_A).cloned().collect();
        let only_a_pos: Vec<Position> =
            all_pos.iter().filter(|p| p.portfolio_id == PID_A).cloned().collect();

        let filtered = engine.compute_report_as_of(&all_tx, &all_pos, Some(PID_A), today);
        let mut pre_filtered = engine.compute_report_as_of(&only_a_tx, &only_a_pos, None, today);
        pre_filtered.portfolio_id = Some(PID_A.to_string());

        assert_eq!(filtered, pre_filtered);
        assert_eq!(filtered.total_fees_deducted, 0.0);
    }

    #[test]
    fn unknown_portfolio_gives_empty_report() {
        let (txs, positions) = buy_and_dividend(PID_A);
        let report = AccountingEngine::new().compute_report_as_of(
            &txs,
            &positions,
            Some("no-such-portfolio"),
            d(2024, 3, 1),
        );
        assert!(report.cash_ledger.is_empty());
        assert!(report.daily_valuations.is_empty());
        assert_eq!(report.total_portfolio_value, 0.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Engine configuration
// ═══════════════════════════════════════════════════════════════════

mod configuration {
    use super::*;

    #[test]
    fn valuation_window_follows_settings() {
        let settings = AccountingSettings {
            valuation_days: 30,
            ..AccountingSettings::default()
        };
        let engine = AccountingEngine::with_settings(settings).unwrap();
        let (txs, positions) = buy_and_dividend(PID_A);
        let report = engine.compute_report_as_of(&txs, &positions, None, d(2024, 3, 1));
        assert_eq!(report.daily_valuations.len(), 30);
        assert_eq!(report.daily_valuations[0].date, d(2024, 2, 1));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = AccountingSettings {
            trading_days_per_year: 0,
            ..AccountingSettings::default()
        };
        assert!(matches!(
            AccountingEngine::with_settings(settings),
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn snapshot_provider_replaces_synthetic_history() {
        let provider = SnapshotValuationProvider::from_snapshots([
            (d(2024, 2, 28), 1000.0),
            (d(2024, 2, 29), 1020.0),
        ]);
        let engine = AccountingEngine::new().with_valuation_provider(Box::new(provider));
        assert_eq!(engine.valuation_provider_name(), "Snapshot");

        let (txs, positions) = buy_and_dividend(PID_A);
        let report = engine.compute_report_as_of(&txs, &positions, None, d(2024, 3, 1));
        let values: Vec<f64> = report
            .daily_valuations
            .iter()
            .rev()
            .take(3)
            .map(|v| v.portfolio_value)
            .collect();
        assert_eq!(values, vec![1050.0, 1020.0, 1000.0]);
    }

    #[test]
    fn debug_names_the_provider() {
        let engine = AccountingEngine::default();
        let rendered = format!("{engine:?}");
        assert!(rendered.contains("Synthetic"));
        assert_eq!(engine.settings(), &AccountingSettings::default());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  JSON entry point and export
// ═══════════════════════════════════════════════════════════════════

mod json {
    use super::*;

    #[test]
    fn report_from_raw_documents() {
        let pid = PID_A;
        let transactions = json!([
            { "id": Uuid::new_v4().to_string(), "portfolio_id": pid, "security_id": "AAPL",
              "transaction_type": "BUY", "quantity": "10", "price": "100",
              "total_amount": "1000", "trade_date": "2024-01-15" },
            { "id": "div-2024-02", "portfolio_id": pid, "security_id": "AAPL",
              "transaction_type": "dividend", "total_amount": 50,
              "trade_date": "2024-02-14T00:00:00Z" },
            { "id": "broken", "portfolio_id": pid, "trade_date": "20/02/2024" }
        ])
        .to_string();
        let positions = json!([
            { "portfolio_id": pid, "security_id": "AAPL", "quantity": 10,
              "average_cost": 100, "current_price": 105 }
        ])
        .to_string();

        let report = AccountingEngine::new()
            .compute_report_from_json(&transactions, &positions, Some(PID_A), d(2024, 3, 1))
            .unwrap();

        assert_eq!(report.cash_ledger.len(), 2);
        assert_eq!(report.cash_ledger[1].transaction_id, "div-2024-02");
        assert_eq!(report.current_cash_balance, -950.0);
        assert_eq!(report.total_portfolio_value, 100.0);
    }

    #[test]
    fn non_array_document_fails() {
        let err = AccountingEngine::new()
            .compute_report_from_json("[]", r#"{"AAPL": 10}"#, None, d(2024, 3, 1))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn report_exports_to_json() {
        let (txs, positions) = buy_and_dividend(PID_A);
        let report =
            AccountingEngine::new().compute_report_as_of(&txs, &positions, None, d(2024, 3, 1));
        let rendered = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        for key in [
            "cash_ledger",
            "corporate_actions",
            "accruals",
            "daily_valuations",
            "performance",
            "current_cash_balance",
            "total_portfolio_value",
            "total_income_received",
            "total_fees_deducted",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["cash_ledger"][0]["entry_type"], "buy_outflow");
        assert_eq!(value["as_of_date"], "2024-03-01");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Concurrency
// ═══════════════════════════════════════════════════════════════════

#[test]
fn one_engine_serves_many_threads() {
    let engine = AccountingEngine::new();
    let (txs_a, pos_a) = buy_and_dividend(PID_A);
    let (txs_b, pos_b) = buy_and_dividend(PID_B);
    let today = d(2024, 3, 1);

    let (a, b) = std::thread::scope(|s| {
        let a = s.spawn(|| engine.compute_report_as_of(&txs_a, &pos_a, Some(PID_A), today));
        let b = s.spawn(|| engine.compute_report_as_of(&txs_b, &pos_b, Some(PID_B), today));
        (a.join().unwrap(), b.join().unwrap())
    });

    assert_eq!(a.total_portfolio_value, b.total_portfolio_value);
    assert_eq!(a.performance, b.performance);
}
