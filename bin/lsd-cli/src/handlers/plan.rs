use anyhow::Result;
use lsd_planner::{
    delegations::{plan_from_delegations, DelegationPlan, DelegationPlanRequest},
    eligibility::{eligible_validators, select_validator},
};
use lsd_primitives::{staking::DelegationRecord, types::Address};
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::{cli::PlanArgs, snapshot::ChainSnapshot};

#[derive(Debug, Serialize)]
pub(crate) struct PlanOutput {
    target: Address,
    eligible: Vec<Address>,
    plan: DelegationPlan,
}

pub(crate) fn handle_plan<R: Rng + ?Sized>(
    snapshot: &ChainSnapshot,
    args: &PlanArgs,
    staking_denom: Option<&str>,
    rng: &mut R,
) -> Result<PlanOutput> {
    let (target, eligible) = match &args.target {
        Some(target) => (
            target.clone(),
            eligible_validators(args.amount, &snapshot.validators),
        ),
        None => {
            let selection = select_validator(args.amount, &snapshot.validators, rng)?;
            (selection.chosen, selection.eligible)
        }
    };

    let delegations: Vec<DelegationRecord> = snapshot
        .delegations
        .iter()
        .filter(|d| d.delegator == args.delegator)
        .filter(|d| staking_denom.map_or(true, |denom| d.balance.denom == denom))
        .cloned()
        .collect();
    info!(
        delegator = %args.delegator,
        delegations = delegations.len(),
        %target,
        "planning redelegation"
    );

    let plan = plan_from_delegations(DelegationPlanRequest {
        delegator: &args.delegator,
        amount: args.amount,
        target_validator: &target,
        eligible: &eligible,
        delegations: &delegations,
    })?;

    Ok(PlanOutput {
        target,
        eligible,
        plan,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use lsd_primitives::{msgs::ChainMsg, types::Coin};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::snapshot::tests::SAMPLE;

    fn args(amount: u128, delegator: &str) -> PlanArgs {
        PlanArgs {
            snapshot: PathBuf::from("snapshot.json"),
            amount,
            delegator: delegator.to_owned(),
            target: None,
        }
    }

    #[test]
    fn delegation_at_saturated_validator_is_moved_then_tokenized() {
        let snapshot = ChainSnapshot::parse(SAMPLE).unwrap();

        let output = handle_plan(
            &snapshot,
            &args(100, "cosmos1user"),
            Some("uatom"),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();

        assert_eq!(output.target, "cosmosvaloper1b");
        assert_eq!(
            output.plan.messages,
            vec![
                ChainMsg::BeginRedelegate {
                    delegator_address: "cosmos1user".to_owned(),
                    validator_src_address: "cosmosvaloper1a".to_owned(),
                    validator_dst_address: "cosmosvaloper1b".to_owned(),
                    amount: Coin::new("uatom", 100),
                },
                ChainMsg::TokenizeShares {
                    delegator_address: "cosmos1user".to_owned(),
                    validator_address: "cosmosvaloper1b".to_owned(),
                    amount: Coin::new("uatom", 99),
                    tokenized_share_owner: "cosmos1user".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn only_the_delegators_own_stake_is_used() {
        let snapshot = ChainSnapshot::parse(SAMPLE).unwrap();

        let err = handle_plan(
            &snapshot,
            &args(101, "cosmos1user"),
            None,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap_err();

        assert!(err.to_string().contains("101"));
    }

    #[test]
    fn other_denominations_are_ignored() {
        let snapshot = ChainSnapshot::parse(SAMPLE).unwrap();

        assert!(handle_plan(
            &snapshot,
            &args(100, "cosmos1user"),
            Some("uosmo"),
            &mut StdRng::seed_from_u64(1),
        )
        .is_err());
    }
}
