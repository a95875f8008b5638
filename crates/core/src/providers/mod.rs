pub mod traits;

// Valuation history implementations
pub mod snapshot;
pub mod synthetic;
