//! Native stake: a single memo-carrying transfer from the source chain to the stake manager.

use lsd_chain_client::ChainClient;
use lsd_operation_sm::{
    plan::{ConfirmationProbe, PlannedTx, Quote, Step},
    request::Accounts,
};
use lsd_params::Params;
use lsd_planner::{quote::derivative_for_stake, transfer::HubRoute};
use lsd_poller::Direction;
use lsd_primitives::types::{Amount, Coin};

use super::{connected, ensure_balance, ibc_timeout_timestamp};
use crate::errors::{ExecError, ExecResult};

pub(super) async fn plan_stake<C>(
    cfg: &Params,
    client: &C,
    accounts: &Accounts,
    amount: Amount,
) -> ExecResult<PlannedTx>
where
    C: ChainClient + ?Sized,
{
    let sender = connected(&accounts.source, "source")?;
    let receiver = connected(&accounts.hub, "hub")?;
    let channel = cfg
        .source
        .stake_channel
        .as_deref()
        .ok_or_else(|| ExecError::MissingRoute("source.stake_channel".to_owned()))?;

    ensure_balance(
        client,
        &cfg.source.chain_id,
        sender,
        &cfg.source.staking_denom,
        amount,
    )
    .await?;
    let pool = client.pool_info(&cfg.hub.pool_addr).await?;

    let route = HubRoute {
        sender,
        channel,
        stake_manager: &cfg.hub.stake_manager,
        hub_address: receiver,
        pool_addr: &cfg.hub.pool_addr,
        timeout_timestamp: ibc_timeout_timestamp(cfg)?,
    };
    let msg = route.native_stake(Coin::new(cfg.source.staking_denom.clone(), amount))?;

    Ok(PlannedTx {
        step: Step::Send,
        chain: cfg.source.chain_id.clone(),
        sender: sender.to_owned(),
        msgs: vec![msg],
        probe: ConfirmationProbe::Balance {
            chain: cfg.hub.chain_id.clone(),
            address: receiver.to_owned(),
            denom: pool.lsd_denom(),
            direction: Direction::Increase,
        },
        followup: None,
        records: None,
        quote: Some(Quote {
            amount,
            will_receive: derivative_for_stake(amount, pool.rate),
        }),
    })
}
