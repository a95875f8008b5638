use log::debug;

use crate::models::corporate_action::{CorporateActionEntry, CorporateActionType};
use crate::models::transaction::{Transaction, TransactionType};

/// Split ratio assumed when the transaction carries none.
const DEFAULT_SPLIT_RATIO: f64 = 2.0;

/// Reclassifies dividend, split, bonus and merger transactions into
/// corporate-action records.
///
/// Conventions carried by the transaction data:
/// - split: `price` holds the ratio, `quantity` the additional shares
/// - bonus: a `transfer` whose notes mention "bonus", or an explicit `bonus`
/// - merger: a `transfer` whose notes mention "merger"/"acquisition", or an explicit `merger`
pub struct CorporateActionService;

impl CorporateActionService {
    pub fn new() -> Self {
        Self
    }

    /// Extract corporate actions, newest first.
    pub fn extract_actions(&self, transactions: &[Transaction]) -> Vec<CorporateActionEntry> {
        let mut actions: Vec<CorporateActionEntry> =
            transactions.iter().filter_map(Self::to_action).collect();

        actions.sort_by(|a, b| b.date.cmp(&a.date));

        debug!("Extracted {} corporate actions", actions.len());
        actions
    }

    fn to_action(tx: &Transaction) -> Option<CorporateActionEntry> {
        let action_type = match &tx.transaction_type {
            TransactionType::Dividend => CorporateActionType::Dividend,
            TransactionType::Split => CorporateActionType::Split,
            TransactionType::Bonus => CorporateActionType::Bonus,
            TransactionType::Merger => CorporateActionType::Merger,
            TransactionType::Transfer => {
                let notes = tx.notes_lower();
                if notes.contains("bonus") {
                    CorporateActionType::Bonus
                } else if notes.contains("merger") || notes.contains("acquisition") {
                    CorporateActionType::Merger
                } else {
                    return None;
                }
            }
            _ => return None,
        };

        let security = &tx.security_id;
        let (description, cash_impact, quantity_impact, price_adjustment_pct) = match action_type {
            CorporateActionType::Dividend => (
                format!("Dividend of {} on {security}", tx.total_amount.abs()),
                tx.total_amount.abs(),
                0.0,
                0.0,
            ),
            CorporateActionType::Split => {
                let ratio = if tx.price > 0.0 {
                    tx.price
                } else {
                    DEFAULT_SPLIT_RATIO
                };
                (
                    format!("{ratio}:1 stock split — {security}"),
                    0.0,
                    tx.quantity,
                    -(1.0 - 1.0 / ratio) * 100.0,
                )
            }
            CorporateActionType::Bonus => (
                format!("Bonus issue — {} shares of {security} at zero cost", tx.quantity),
                0.0,
                tx.quantity,
                0.0,
            ),
            CorporateActionType::Merger => (
                format!("Merger/acquisition — {security}"),
                tx.total_amount,
                tx.quantity,
                0.0,
            ),
        };

        Some(CorporateActionEntry {
            transaction_id: tx.id.clone(),
            date: tx.trade_date,
            action_type,
            security_id: tx.security_id.clone(),
            description,
            cash_impact,
            quantity_impact,
            price_adjustment_pct,
        })
    }
}

impl Default for CorporateActionService {
    fn default() -> Self {
        Self::new()
    }
}
