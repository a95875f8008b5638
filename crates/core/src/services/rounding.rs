/// Round a percentage (or ratio) to 2 decimals. Non-finite input becomes 0.
pub fn round_pct(value: f64) -> f64 {
    round_dp(value, 2)
}

/// Round a currency amount to whole units. Non-finite input becomes 0.
pub fn round_currency(value: f64) -> f64 {
    round_dp(value, 0)
}

/// Round a currency amount to cents. Used for per-holding income figures
/// that are too small for whole units.
pub fn round_cents(value: f64) -> f64 {
    round_dp(value, 2)
}

fn round_dp(value: f64, dp: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(dp);
    // Adding +0.0 turns a rounded -0.0 into 0.0
    (value * factor).round() / factor + 0.0
}
