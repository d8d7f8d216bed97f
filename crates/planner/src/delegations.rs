//! Plans the first transaction of a staked redelegation: move delegations held with validators
//! outside the eligible set onto the target, then tokenize them.

use lsd_primitives::{
    msgs::ChainMsg,
    staking::DelegationRecord,
    types::{Address, Amount, Coin},
};
use serde::{Deserialize, Serialize};

use crate::errors::{PlanError, PlanResult};

/// Inputs for [`plan_from_delegations`].
#[derive(Debug, Clone, Copy)]
pub struct DelegationPlanRequest<'a> {
    /// The delegator, who also owns the resulting share tokens.
    pub delegator: &'a str,

    /// Total amount to redelegate.
    pub amount: Amount,

    /// Validator receiving delegations from non-eligible validators.
    pub target_validator: &'a str,

    /// Validators that can accept liquid stake.
    pub eligible: &'a [Address],

    /// The delegator's current delegations.
    pub delegations: &'a [DelegationRecord],
}

/// How much was taken from one delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
    /// Validator the delegation was with.
    pub validator: Address,

    /// Amount taken.
    pub amount: Amount,

    /// Whether the amount had to be moved to the target validator first.
    pub redelegated: bool,
}

/// The messages of the first transaction and bookkeeping for the second one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationPlan {
    /// Redelegate and tokenize messages, in submission order.
    pub messages: Vec<ChainMsg>,

    /// Per-delegation breakdown of the requested amount.
    pub consumed: Vec<Consumption>,

    /// Number of tokenize messages, i.e. records expected to appear once confirmed.
    pub tokenize_count: usize,
}

/// Plans redelegation and tokenization of `request.amount` from the delegator's delegations.
///
/// Delegations are consumed largest first (ties broken by validator address) until the amount is
/// covered. A delegation with a validator outside the eligible set is first redelegated to the
/// target. Each consumed portion is then tokenized minus one unit to absorb share rounding, except
/// a single unit which is tokenized as is.
pub fn plan_from_delegations(request: DelegationPlanRequest<'_>) -> PlanResult<DelegationPlan> {
    if request.amount == 0 {
        return Err(PlanError::ZeroAmount);
    }

    let mut ordered: Vec<&DelegationRecord> = request.delegations.iter().collect();
    ordered.sort_by(|a, b| {
        b.balance
            .amount
            .cmp(&a.balance.amount)
            .then_with(|| a.validator.cmp(&b.validator))
    });

    let mut remaining = request.amount;
    let mut plan = DelegationPlan {
        messages: Vec::new(),
        consumed: Vec::new(),
        tokenize_count: 0,
    };

    for delegation in ordered {
        if remaining == 0 {
            break;
        }

        let take = delegation.balance.amount.min(remaining);
        if take == 0 {
            continue;
        }

        let redelegated = !request.eligible.contains(&delegation.validator);
        let tokenize_validator = if redelegated {
            plan.messages.push(ChainMsg::BeginRedelegate {
                delegator_address: request.delegator.to_owned(),
                validator_src_address: delegation.validator.clone(),
                validator_dst_address: request.target_validator.to_owned(),
                amount: Coin::new(delegation.balance.denom.clone(), take),
            });
            request.target_validator
        } else {
            delegation.validator.as_str()
        };

        let tokenized = if take > 1 { take - 1 } else { take };
        plan.messages.push(ChainMsg::TokenizeShares {
            delegator_address: request.delegator.to_owned(),
            validator_address: tokenize_validator.to_owned(),
            amount: Coin::new(delegation.balance.denom.clone(), tokenized),
            tokenized_share_owner: request.delegator.to_owned(),
        });
        plan.tokenize_count += 1;

        plan.consumed.push(Consumption {
            validator: delegation.validator.clone(),
            amount: take,
            redelegated,
        });
        remaining -= take;
    }

    if remaining > 0 {
        let available = request
            .delegations
            .iter()
            .fold(0 as Amount, |acc, d| acc.saturating_add(d.balance.amount));
        return Err(PlanError::InsufficientDelegation {
            requested: request.amount,
            available,
        });
    }

    Ok(plan)
}
