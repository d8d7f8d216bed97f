//! Redelegation to the hub, from plain delegations or from share tokens.
//!
//! Both flows may need two transactions. The first moves stake onto an eligible validator and
//! tokenizes it; the tokenize-share records it creates can only be looked up once it has landed.
//! The second transfers every share token to the stake manager.

use std::collections::BTreeMap;

use lsd_chain_client::ChainClient;
use lsd_operation_sm::{
    plan::{ConfirmationProbe, FollowUp, PlannedTx, Quote, Step},
    request::Accounts,
};
use lsd_params::Params;
use lsd_planner::{
    delegations::{plan_from_delegations, DelegationPlanRequest},
    eligibility::{select_validator, ValidatorSelection},
    lsm::{plan_from_shares, LsmPlanRequest},
    quote::derivative_for_stake,
    transfer::{newest_records, share_transfers, HubRoute},
};
use lsd_poller::Direction;
use lsd_primitives::{
    hub::PoolInfo,
    msgs::ChainMsg,
    staking::{LsmShare, TokenizeShareLock, TokenizedShareRecord, ValidatorSnapshot},
    types::{Address, Amount, RecordId},
};
use tracing::{debug, info};

use super::{connected, ensure_balance, ibc_timeout_timestamp};
use crate::errors::{ExecError, ExecResult};

/// Chain state every redelegation starts from, after its preconditions have been checked.
struct Preflight {
    pool: PoolInfo,
    validators: Vec<ValidatorSnapshot>,
    selection: ValidatorSelection,
}

async fn preflight<C>(cfg: &Params, client: &C, sender: &str, amount: Amount) -> ExecResult<Preflight>
where
    C: ChainClient + ?Sized,
{
    match client.tokenize_share_lock(sender).await? {
        TokenizeShareLock::Unlocked => {}
        TokenizeShareLock::Locked => return Err(ExecError::TokenizeLocked),
        TokenizeShareLock::LockExpiring { unlock_time } => {
            return Err(ExecError::TokenizeLockExpiring(unlock_time))
        }
    }

    let pool = client.pool_info(&cfg.hub.pool_addr).await?;
    let mut validators = Vec::with_capacity(pool.validator_addrs.len());
    for addr in &pool.validator_addrs {
        validators.push(client.validator(addr).await?);
    }

    let selection = select_validator(amount, &validators, &mut rand::thread_rng())?;
    if client
        .delegation(sender, &selection.chosen)
        .await?
        .is_some_and(|delegation| delegation.validator_bond)
    {
        return Err(ExecError::ValidatorBond);
    }

    Ok(Preflight {
        pool,
        validators,
        selection,
    })
}

fn route<'a>(
    cfg: &'a Params,
    sender: &'a str,
    receiver: &'a str,
) -> ExecResult<HubRoute<'a>> {
    let channel = cfg
        .source
        .stake_channel
        .as_deref()
        .ok_or_else(|| ExecError::MissingRoute("source.stake_channel".to_owned()))?;
    Ok(HubRoute {
        sender,
        channel,
        stake_manager: &cfg.hub.stake_manager,
        hub_address: receiver,
        pool_addr: &cfg.hub.pool_addr,
        timeout_timestamp: ibc_timeout_timestamp(cfg)?,
    })
}

fn send_tx(
    cfg: &Params,
    sender: &str,
    receiver: &str,
    lsd_denom: String,
    msgs: Vec<ChainMsg>,
    records: Vec<TokenizedShareRecord>,
    quote: Option<Quote>,
) -> PlannedTx {
    PlannedTx {
        step: Step::Send,
        chain: cfg.source.chain_id.clone(),
        sender: sender.to_owned(),
        msgs,
        probe: ConfirmationProbe::Balance {
            chain: cfg.hub.chain_id.clone(),
            address: receiver.to_owned(),
            denom: lsd_denom,
            direction: Direction::Increase,
        },
        followup: None,
        records: Some(records),
        quote,
    }
}

fn prepare_tx(
    cfg: &Params,
    sender: &str,
    msgs: Vec<ChainMsg>,
    followup: FollowUp,
    quote: Quote,
) -> PlannedTx {
    PlannedTx {
        step: Step::Prepare,
        chain: cfg.source.chain_id.clone(),
        sender: sender.to_owned(),
        msgs,
        probe: ConfirmationProbe::ShareRecords {
            owner: sender.to_owned(),
            expected: followup.tokenize_count,
        },
        followup: Some(followup),
        records: None,
        quote: Some(quote),
    }
}

pub(super) async fn plan_from_staked<C>(
    cfg: &Params,
    client: &C,
    accounts: &Accounts,
    amount: Amount,
) -> ExecResult<PlannedTx>
where
    C: ChainClient + ?Sized,
{
    let sender = connected(&accounts.source, "source")?;
    connected(&accounts.hub, "hub")?;

    let preflight = preflight(cfg, client, sender, amount).await?;
    let delegations = client.delegations(sender).await?;

    let plan = plan_from_delegations(DelegationPlanRequest {
        delegator: sender,
        amount,
        target_validator: &preflight.selection.chosen,
        eligible: &preflight.selection.eligible,
        delegations: &delegations,
    })?;
    info!(
        target = %preflight.selection.chosen,
        tokenize = plan.tokenize_count,
        "planned delegation tokenization"
    );

    Ok(prepare_tx(
        cfg,
        sender,
        plan.messages,
        FollowUp {
            tokenize_count: plan.tokenize_count,
            direct: Vec::new(),
        },
        Quote {
            amount,
            will_receive: derivative_for_stake(amount, preflight.pool.rate),
        },
    ))
}

pub(super) async fn plan_from_lsm<C>(
    cfg: &Params,
    client: &C,
    accounts: &Accounts,
    shares: &[LsmShare],
) -> ExecResult<PlannedTx>
where
    C: ChainClient + ?Sized,
{
    let sender = connected(&accounts.source, "source")?;
    let receiver = connected(&accounts.hub, "hub")?;

    for share in shares.iter().filter(|share| share.amount > 0) {
        ensure_balance(
            client,
            &cfg.source.chain_id,
            sender,
            &share.denom(),
            share.amount,
        )
        .await?;
    }

    let amount = shares
        .iter()
        .fold(0, |acc: Amount, share| acc.saturating_add(share.amount));
    let preflight = preflight(cfg, client, sender, amount).await?;

    let mut validators: BTreeMap<Address, ValidatorSnapshot> = preflight
        .validators
        .into_iter()
        .map(|v| (v.operator_address.clone(), v))
        .collect();
    for share in shares {
        if !validators.contains_key(&share.validator) {
            let snapshot = client.validator(&share.validator).await?;
            validators.insert(share.validator.clone(), snapshot);
        }
    }

    let plan = plan_from_shares(LsmPlanRequest {
        delegator: sender,
        target_validator: &preflight.selection.chosen,
        eligible: &preflight.selection.eligible,
        shares,
        validators: &validators,
        staking_denom: &cfg.source.staking_denom,
    })?;

    let quote = Quote {
        amount,
        will_receive: derivative_for_stake(amount, preflight.pool.rate),
    };

    if plan.needs_preparation() {
        info!(
            target = %preflight.selection.chosen,
            tokenize = plan.tokenize_count,
            direct = plan.direct.len(),
            "planned share re-tokenization"
        );
        return Ok(prepare_tx(
            cfg,
            sender,
            plan.prepare_messages,
            FollowUp {
                tokenize_count: plan.tokenize_count,
                direct: plan.direct,
            },
            quote,
        ));
    }

    debug!(direct = plan.direct.len(), "all shares are directly sendable");
    let route = route(cfg, sender, receiver)?;
    let msgs = share_transfers(&route, &[], &plan.direct, &[])?;
    Ok(send_tx(
        cfg,
        sender,
        receiver,
        preflight.pool.lsd_denom(),
        msgs,
        Vec::new(),
        Some(quote),
    ))
}

/// Plans the transfer of every share token created by the confirmed preparation transaction, plus
/// the shares that could be sent as they were.
///
/// Only records with an id above `records_after` can come from the preparation. Records pinned by
/// an earlier attempt are reused so that a retried send transfers the same records; balances are
/// always read fresh.
pub(super) async fn plan_send<C>(
    cfg: &Params,
    client: &C,
    accounts: &Accounts,
    followup: &FollowUp,
    records_after: RecordId,
    pinned: Option<&[TokenizedShareRecord]>,
) -> ExecResult<PlannedTx>
where
    C: ChainClient + ?Sized,
{
    let sender = connected(&accounts.source, "source")?;
    let receiver = connected(&accounts.hub, "hub")?;

    let records = match pinned {
        Some(records) => records.to_vec(),
        None => {
            let created = client
                .tokenize_share_records(sender)
                .await?
                .into_iter()
                .filter(|record| record.id > records_after)
                .collect::<Vec<_>>();
            newest_records(&created, followup.tokenize_count)?
        }
    };
    let balances = client.all_balances(&cfg.source.chain_id, sender).await?;
    let pool = client.pool_info(&cfg.hub.pool_addr).await?;

    let route = route(cfg, sender, receiver)?;
    let msgs = share_transfers(&route, &records, &followup.direct, &balances)?;
    info!(records = records.len(), direct = followup.direct.len(), "planned share transfers");

    Ok(send_tx(
        cfg,
        sender,
        receiver,
        pool.lsd_denom(),
        msgs,
        records,
        None,
    ))
}
