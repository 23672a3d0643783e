use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MAIN_WALLET_TYPE: &str = "MAIN";

/// Currencies every new player gets a MAIN wallet for.
pub const DEFAULT_WALLET_CURRENCIES: [&str; 2] = ["VND", "USD"];

/// Wallet balances carry two fractional digits.
pub const BALANCE_SCALE: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub user_id: i64,
    pub wallet_type: String,
    pub balance: Decimal,
    pub currency: String,
}

impl Wallet {
    pub fn balance_from_minor_units(minor: i64) -> Decimal {
        Decimal::new(minor, BALANCE_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_from_minor_units() {
        assert_eq!(Wallet::balance_from_minor_units(0).to_string(), "0.00");
        assert_eq!(Wallet::balance_from_minor_units(12345).to_string(), "123.45");
    }
}
