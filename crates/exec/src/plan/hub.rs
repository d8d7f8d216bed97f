//! Unstake and withdraw, both executed against the stake manager on the hub.

use lsd_chain_client::ChainClient;
use lsd_operation_sm::{
    plan::{ConfirmationProbe, PlannedTx, Quote, Step},
    request::Accounts,
};
use lsd_params::Params;
use lsd_planner::{
    hub::{unstake_messages, withdraw_message},
    quote::tokens_for_unstake,
    withdrawal::WithdrawalInfo,
};
use lsd_poller::Direction;
use lsd_primitives::types::{Amount, Coin};
use tracing::debug;

use super::{connected, ensure_balance};
use crate::errors::{ExecError, ExecResult};

pub(super) async fn plan_unstake<C>(
    cfg: &Params,
    client: &C,
    accounts: &Accounts,
    amount: Amount,
) -> ExecResult<PlannedTx>
where
    C: ChainClient + ?Sized,
{
    let owner = connected(&accounts.hub, "hub")?;
    let pool = client.pool_info(&cfg.hub.pool_addr).await?;
    let lsd_denom = pool.lsd_denom();

    ensure_balance(client, &cfg.hub.chain_id, owner, &lsd_denom, amount).await?;
    let allowance = client
        .allowance(&pool.lsd_token, owner, &cfg.hub.stake_manager)
        .await?;

    let msgs = unstake_messages(
        owner,
        &pool.lsd_token,
        &cfg.hub.stake_manager,
        &cfg.hub.pool_addr,
        amount,
        allowance,
    )?;

    Ok(PlannedTx {
        step: Step::Send,
        chain: cfg.hub.chain_id.clone(),
        sender: owner.to_owned(),
        msgs,
        probe: ConfirmationProbe::Balance {
            chain: cfg.hub.chain_id.clone(),
            address: owner.to_owned(),
            denom: lsd_denom,
            direction: Direction::Decrease,
        },
        followup: None,
        records: None,
        quote: Some(Quote {
            amount,
            will_receive: tokens_for_unstake(amount, pool.rate),
        }),
    })
}

pub(super) async fn plan_withdraw<C>(
    cfg: &Params,
    client: &C,
    accounts: &Accounts,
) -> ExecResult<PlannedTx>
where
    C: ChainClient + ?Sized,
{
    let owner = connected(&accounts.hub, "hub")?;
    let receiver = connected(&accounts.source, "source")?;

    let pool = client.pool_info(&cfg.hub.pool_addr).await?;
    let records = client.unstake_records(owner, &cfg.hub.pool_addr).await?;
    let info = WithdrawalInfo::compute(
        pool.era,
        pool.unbonding_period,
        pool.era_seconds,
        &records,
    );
    if !info.has_withdrawable() {
        return Err(ExecError::NothingToWithdraw);
    }

    let fee = client.withdraw_fees().await?.total(&cfg.hub.fee_denom);
    let required = fee.saturating_add(cfg.hub.min_fee_reserve);
    let available = client
        .balance(&cfg.hub.chain_id, owner, &cfg.hub.fee_denom)
        .await?;
    if available < required {
        return Err(ExecError::InsufficientFeeBalance {
            required,
            available,
        });
    }
    debug!(%fee, withdrawable = %info.withdrawable, indices = ?info.indices, "withdrawing");

    let msg = withdraw_message(
        owner,
        &cfg.hub.stake_manager,
        &cfg.hub.pool_addr,
        receiver,
        info.indices.clone(),
        Some(Coin::new(cfg.hub.fee_denom.clone(), fee)),
    )?;

    Ok(PlannedTx {
        step: Step::Send,
        chain: cfg.hub.chain_id.clone(),
        sender: owner.to_owned(),
        msgs: vec![msg],
        probe: ConfirmationProbe::UnstakeCleared {
            owner: owner.to_owned(),
            pool_addr: cfg.hub.pool_addr.clone(),
            indices: info.indices,
        },
        followup: None,
        records: None,
        quote: Some(Quote {
            amount: info.withdrawable,
            will_receive: Some(info.withdrawable),
        }),
    })
}
