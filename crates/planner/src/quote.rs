//! Expected outcome of staking or unstaking at the pool's current rate.

use lsd_primitives::{decimal::Dec, types::Amount};

/// Derivative tokens received for staking `amount`, given `rate` tokens per derivative.
pub fn derivative_for_stake(amount: Amount, rate: Dec) -> Option<Amount> {
    rate.div_floor(amount)
}

/// Tokens owed for unstaking `amount` derivative tokens, given `rate` tokens per derivative.
pub fn tokens_for_unstake(amount: Amount, rate: Dec) -> Option<Amount> {
    rate.mul_floor(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_round_down() {
        let rate: Dec = "1.1".parse().unwrap();
        assert_eq!(derivative_for_stake(100, rate), Some(90));
        assert_eq!(tokens_for_unstake(100, rate), Some(110));
        assert_eq!(derivative_for_stake(100, Dec::ZERO), None);
    }
}
