pub mod accrual;
pub mod corporate_action;
pub mod ledger;
pub mod performance;
pub mod position;
pub mod report;
pub mod settings;
pub mod transaction;
pub mod valuation;
