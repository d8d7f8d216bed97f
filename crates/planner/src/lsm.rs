//! Plans the first transaction of an LSM redelegation: share tokens backed by validators outside
//! the eligible set are redeemed, redelegated to the target and tokenized again.

use std::collections::BTreeMap;

use lsd_primitives::{
    msgs::ChainMsg,
    staking::{LsmShare, ValidatorSnapshot},
    types::{Address, Coin},
};
use serde::{Deserialize, Serialize};

use crate::errors::{PlanError, PlanResult};

/// Inputs for [`plan_from_shares`].
#[derive(Debug, Clone, Copy)]
pub struct LsmPlanRequest<'a> {
    /// Holder of the share tokens.
    pub delegator: &'a str,

    /// Validator receiving redeemed delegations.
    pub target_validator: &'a str,

    /// Validators whose share tokens the pool accepts as-is.
    pub eligible: &'a [Address],

    /// Share tokens selected by the user.
    pub shares: &'a [LsmShare],

    /// Snapshots of the validators backing non-eligible shares.
    pub validators: &'a BTreeMap<Address, ValidatorSnapshot>,

    /// Native staking denomination.
    pub staking_denom: &'a str,
}

/// Result of [`plan_from_shares`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsmPlan {
    /// Redeem, redelegate and tokenize messages. Empty when every share is already eligible.
    pub prepare_messages: Vec<ChainMsg>,

    /// Number of tokenize messages in `prepare_messages`.
    pub tokenize_count: usize,

    /// Shares that can be sent to the hub without preparation.
    pub direct: Vec<LsmShare>,
}

impl LsmPlan {
    /// Whether a preparation transaction is needed before sending.
    pub fn needs_preparation(&self) -> bool {
        !self.prepare_messages.is_empty()
    }
}

/// Splits the selected shares into directly sendable ones and ones that must be re-tokenized
/// against the target validator.
///
/// For a re-tokenized share the redeemed token amount is `amount * tokens / delegator_shares` of
/// its validator; all of it is redelegated and all but one unit is tokenized (a single unit is
/// tokenized whole).
pub fn plan_from_shares(request: LsmPlanRequest<'_>) -> PlanResult<LsmPlan> {
    if request.shares.iter().all(|share| share.amount == 0) {
        return Err(PlanError::ZeroAmount);
    }

    let mut plan = LsmPlan {
        prepare_messages: Vec::new(),
        tokenize_count: 0,
        direct: Vec::new(),
    };

    for share in request.shares.iter().filter(|share| share.amount > 0) {
        if request.eligible.contains(&share.validator) {
            plan.direct.push(share.clone());
            continue;
        }

        let validator = request
            .validators
            .get(&share.validator)
            .ok_or_else(|| PlanError::ValidatorNotFound(share.validator.clone()))?;
        if validator.delegator_shares.is_zero() {
            return Err(PlanError::EmptyValidator(share.validator.clone()));
        }
        let received = validator
            .shares_to_tokens(share.amount)
            .ok_or(PlanError::Overflow)?;
        if received == 0 {
            return Err(PlanError::DustShares(share.denom()));
        }

        plan.prepare_messages.push(ChainMsg::RedeemTokensForShares {
            delegator_address: request.delegator.to_owned(),
            amount: Coin::new(share.denom(), share.amount),
        });
        plan.prepare_messages.push(ChainMsg::BeginRedelegate {
            delegator_address: request.delegator.to_owned(),
            validator_src_address: share.validator.clone(),
            validator_dst_address: request.target_validator.to_owned(),
            amount: Coin::new(request.staking_denom, received),
        });
        let tokenized = if received > 1 { received - 1 } else { received };
        plan.prepare_messages.push(ChainMsg::TokenizeShares {
            delegator_address: request.delegator.to_owned(),
            validator_address: request.target_validator.to_owned(),
            amount: Coin::new(request.staking_denom, tokenized),
            tokenized_share_owner: request.delegator.to_owned(),
        });
        plan.tokenize_count += 1;
    }

    Ok(plan)
}
