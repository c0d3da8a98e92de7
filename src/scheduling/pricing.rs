//! Deposit and discount money math
//!
//! All amounts are whole currency units; rounding is half-up and must be
//! applied anywhere a derived amount is stored or displayed, so client-shown
//! and server-stored figures never drift apart.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to the currency's display unit (whole units, half-up).
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Required deposit for a base amount at the service's deposit percentage.
pub fn deposit_amount(base: Decimal, deposit_percentage: i16) -> Decimal {
    round_money(base * Decimal::from(deposit_percentage) / Decimal::from(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_of_ten_thousand_is_five_thousand() {
        assert_eq!(
            deposit_amount(Decimal::from(10_000), 50),
            Decimal::from(5_000)
        );
    }

    #[test]
    fn midpoint_rounds_up() {
        // 333 * 50% = 166.5 -> 167
        assert_eq!(deposit_amount(Decimal::from(333), 50), Decimal::from(167));
    }

    #[test]
    fn zero_percentage_requires_nothing() {
        assert_eq!(deposit_amount(Decimal::from(10_000), 0), Decimal::ZERO);
    }

    #[test]
    fn full_percentage_requires_everything() {
        assert_eq!(
            deposit_amount(Decimal::from(7_250), 100),
            Decimal::from(7_250)
        );
    }

    #[test]
    fn deposit_plus_remainder_reconstructs_the_amount() {
        for amount in [0i64, 1, 99, 333, 5_000, 10_000, 123_457] {
            for pct in [0i16, 1, 10, 33, 50, 66, 99, 100] {
                let amount = Decimal::from(amount);
                let deposit = deposit_amount(amount, pct);
                assert!(deposit >= Decimal::ZERO);
                assert!(deposit <= amount || amount == Decimal::ZERO);
                assert_eq!(deposit + (amount - deposit), amount);
            }
        }
    }
}
