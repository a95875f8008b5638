pub mod accrual_service;
pub mod corporate_action_service;
pub mod irr_solver;
pub mod ledger_service;
pub mod performance_service;
pub mod report_service;
pub mod rounding;
