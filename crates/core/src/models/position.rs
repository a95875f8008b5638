use serde::{Deserialize, Serialize};

/// Current holding of one security in one portfolio.
///
/// A position is a snapshot of "now". It carries no history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub portfolio_id: String,

    pub security_id: String,

    pub quantity: f64,

    pub average_cost: f64,

    pub current_price: f64,

    /// Market value at `current_price`
    pub market_value: f64,
}

impl Position {
    /// Build a position whose market value is `quantity × current_price`.
    pub fn new(
        portfolio_id: impl Into<String>,
        security_id: impl Into<String>,
        quantity: f64,
        average_cost: f64,
        current_price: f64,
    ) -> Self {
        Self {
            portfolio_id: portfolio_id.into(),
            security_id: security_id.into(),
            quantity,
            average_cost,
            current_price,
            market_value: quantity * current_price,
        }
    }

    /// A position counts as held while it has units left.
    pub fn is_held(&self) -> bool {
        self.quantity > f64::EPSILON
    }
}
