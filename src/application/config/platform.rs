use std::env;

use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Play-money balance granted on signup.
    pub initial_balance: Decimal,
}

impl PlatformConfig {
    pub fn from_env() -> Self {
        Self {
            initial_balance: parse_decimal("BETCLASS_INITIAL_BALANCE", "1000.00"),
        }
    }
}

fn parse_decimal(var: &str, default: &str) -> Decimal {
    env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| default.parse().expect("valid default decimal"))
}
