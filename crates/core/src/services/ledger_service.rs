use log::debug;

use crate::models::ledger::{CashLedgerEntry, CashLedgerEntryType};
use crate::models::transaction::{Transaction, TransactionType};

/// Turns transactions into a chronological cash ledger with running balances.
///
/// Pure business logic: no I/O and no state.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Build the cash ledger for `transactions` (any order, any portfolio).
    ///
    /// Entries come out sorted by trade date ascending; same-day entries keep
    /// `created_at` order, then input order. The running balance starts at 0.
    pub fn build_ledger(&self, transactions: &[Transaction]) -> Vec<CashLedgerEntry> {
        let mut ordered: Vec<&Transaction> = transactions.iter().collect();
        // Stable sort: ties keep input order
        ordered.sort_by(|a, b| {
            a.trade_date
                .cmp(&b.trade_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });

        let mut balance = 0.0;
        let ledger: Vec<CashLedgerEntry> = ordered
            .into_iter()
            .map(|tx| {
                let (entry_type, amount, description) = Self::classify(tx);
                balance += amount;
                CashLedgerEntry {
                    transaction_id: tx.id.clone(),
                    date: tx.trade_date,
                    entry_type,
                    security_id: tx.security_id.clone(),
                    description,
                    amount,
                    running_balance: balance,
                }
            })
            .collect();

        debug!(
            "Built cash ledger: {} entries, closing balance {}",
            ledger.len(),
            balance
        );
        ledger
    }

    /// Map one transaction to its ledger type, signed amount and description.
    ///
    /// Buys, sells, dividends and fees take their sign from the type, so a
    /// negative `total_amount` cannot flip a buy into an inflow. Transfers keep
    /// the sign from the data, and direction is read from that signed amount.
    fn classify(tx: &Transaction) -> (CashLedgerEntryType, f64, String) {
        let total = tx.total_amount;
        let security = &tx.security_id;
        let notes = tx.notes.as_deref().unwrap_or("");

        match &tx.transaction_type {
            TransactionType::Buy => (
                CashLedgerEntryType::BuyOutflow,
                -total.abs(),
                format!("Buy {security} — {} @ {}", tx.quantity, tx.price),
            ),
            TransactionType::Sell => (
                CashLedgerEntryType::SellProceeds,
                total.abs(),
                format!("Sell {security} — {} @ {}", tx.quantity, tx.price),
            ),
            TransactionType::Dividend => (
                CashLedgerEntryType::Dividend,
                total.abs(),
                format!("Dividend received — {security}"),
            ),
            TransactionType::Fee => (
                CashLedgerEntryType::Fee,
                -total.abs(),
                format!("Fee deducted: {notes}"),
            ),
            TransactionType::Transfer => {
                let amount = total;
                let entry_type = if amount < 0.0 {
                    CashLedgerEntryType::Withdrawal
                } else {
                    CashLedgerEntryType::Deposit
                };
                (entry_type, amount, format!("Transfer: {notes}"))
            }
            other => (
                CashLedgerEntryType::CorporateAction,
                0.0,
                format!("{other} — {security}"),
            ),
        }
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
