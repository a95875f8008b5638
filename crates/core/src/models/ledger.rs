use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Semantic cash-flow type of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashLedgerEntryType {
    Dividend,
    Fee,
    Deposit,
    Withdrawal,
    SellProceeds,
    BuyOutflow,
    Accrual,
    CorporateAction,
}

impl CashLedgerEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CashLedgerEntryType::Dividend => "dividend",
            CashLedgerEntryType::Fee => "fee",
            CashLedgerEntryType::Deposit => "deposit",
            CashLedgerEntryType::Withdrawal => "withdrawal",
            CashLedgerEntryType::SellProceeds => "sell_proceeds",
            CashLedgerEntryType::BuyOutflow => "buy_outflow",
            CashLedgerEntryType::Accrual => "accrual",
            CashLedgerEntryType::CorporateAction => "corporate_action",
        }
    }

    /// Entries that count as income received.
    pub fn is_income(&self) -> bool {
        matches!(self, CashLedgerEntryType::Dividend | CashLedgerEntryType::Accrual)
    }
}

impl std::fmt::Display for CashLedgerEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of the cash ledger. Inflows are positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashLedgerEntry {
    /// The transaction this entry was derived from
    pub transaction_id: String,

    pub date: NaiveDate,

    pub entry_type: CashLedgerEntryType,

    pub security_id: String,

    pub description: String,

    /// Signed cash impact (inflow positive)
    pub amount: f64,

    /// Balance after applying this entry, starting from 0
    pub running_balance: f64,
}

/// Cash balance at the end of `date`: the running balance of the last entry
/// dated on or before it, 0 if there is none.
///
/// `ledger` must be in date-ascending order.
pub fn balance_as_of(ledger: &[CashLedgerEntry], date: NaiveDate) -> f64 {
    let idx = ledger.partition_point(|e| e.date <= date);
    if idx == 0 {
        0.0
    } else {
        ledger[idx - 1].running_balance
    }
}

/// All entries for one security, in ledger order.
pub fn entries_for_security<'a>(
    ledger: &'a [CashLedgerEntry],
    security_id: &str,
) -> Vec<&'a CashLedgerEntry> {
    ledger.iter().filter(|e| e.security_id == security_id).collect()
}

/// All entries of one type, in ledger order.
pub fn entries_of_type(
    ledger: &[CashLedgerEntry],
    entry_type: CashLedgerEntryType,
) -> Vec<&CashLedgerEntry> {
    ledger.iter().filter(|e| e.entry_type == entry_type).collect()
}

/// Export the ledger as CSV.
/// Columns: transaction_id, date, entry_type, security_id, description, amount, running_balance
pub fn ledger_to_csv(ledger: &[CashLedgerEntry]) -> String {
    let mut csv = String::from(
        "transaction_id,date,entry_type,security_id,description,amount,running_balance\n",
    );
    for entry in ledger {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            escape_csv(&entry.transaction_id),
            entry.date,
            entry.entry_type,
            escape_csv(&entry.security_id),
            escape_csv(&entry.description),
            entry.amount,
            entry.running_balance,
        ));
    }
    csv
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
