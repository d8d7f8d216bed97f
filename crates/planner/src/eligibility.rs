//! Decides which validators can accept additional liquid stake.

use ethnum::U256;
use lsd_primitives::{
    decimal::{BondFactor, DEC_ONE_RAW},
    staking::ValidatorSnapshot,
    types::{Address, Amount},
};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{PlanError, PlanResult};

/// Whether `validator` can accept `requested` additional liquid shares.
///
/// Two caps apply: the liquid fraction of the validator's shares after the deposit must not exceed
/// the liquid-staking cap, and unless the bond factor is unlimited, the liquid shares after the
/// deposit must not exceed `validator_bond_shares * bond_factor`.
pub fn is_eligible(validator: &ValidatorSnapshot, requested: Amount) -> bool {
    let one = U256::from(DEC_ONE_RAW);
    let requested = U256::from(requested) * one;
    let liquid_after = validator.liquid_shares.wide() + requested;
    let total_after = validator.delegator_shares.wide() + requested;
    let Some(scaled_liquid) = liquid_after.checked_mul(one) else {
        return false;
    };

    // liquid_after / total_after <= cap, cross-multiplied to stay in integers
    if !within(scaled_liquid, validator.liquid_staking_cap.wide(), total_after) {
        return false;
    }

    match validator.bond_factor {
        BondFactor::Unlimited => true,
        BondFactor::Factor(factor) => within(
            scaled_liquid,
            validator.validator_bond_shares.wide(),
            factor.wide(),
        ),
    }
}

/// Whether `value <= a * b`. A product beyond `U256` exceeds every `value`.
fn within(value: U256, a: U256, b: U256) -> bool {
    a.checked_mul(b).map_or(true, |limit| value <= limit)
}

/// Operator addresses of the validators that can accept `requested`, in input order.
pub fn eligible_validators(requested: Amount, validators: &[ValidatorSnapshot]) -> Vec<Address> {
    validators
        .iter()
        .filter(|v| is_eligible(v, requested))
        .map(|v| v.operator_address.clone())
        .collect()
}

/// The eligible set together with the validator picked as redelegation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSelection {
    /// All validators able to accept the amount.
    pub eligible: Vec<Address>,

    /// The validator new liquid stake is sent to.
    pub chosen: Address,
}

/// Computes the eligible set and picks one member uniformly at random.
pub fn select_validator<R: Rng + ?Sized>(
    requested: Amount,
    validators: &[ValidatorSnapshot],
    rng: &mut R,
) -> PlanResult<ValidatorSelection> {
    let eligible = eligible_validators(requested, validators);
    let chosen = eligible
        .choose(rng)
        .cloned()
        .ok_or(PlanError::NoEligibleValidator { requested })?;

    debug!(%requested, eligible = eligible.len(), %chosen, "selected target validator");

    Ok(ValidatorSelection { eligible, chosen })
}
