//! Moves the derivative token between the hub and a bridge target.

use lsd_chain_client::ChainClient;
use lsd_operation_sm::{
    plan::{ConfirmationProbe, PlannedTx, Quote, Step},
    request::{Accounts, BridgeRoute},
};
use lsd_params::{bridge::BridgeTarget, Params};
use lsd_planner::bridge::{bridge_denom, from_hub, to_hub};
use lsd_poller::Direction;
use lsd_primitives::types::{Amount, ChainId};

use super::{connected, ensure_balance, ibc_timeout_timestamp};
use crate::errors::{ExecError, ExecResult};

fn target<'a>(cfg: &'a Params, chain_id: &ChainId) -> ExecResult<&'a BridgeTarget> {
    cfg.bridge
        .target(chain_id)
        .ok_or_else(|| ExecError::MissingRoute(format!("bridge target {chain_id}")))
}

pub(super) async fn plan_bridge<C>(
    cfg: &Params,
    client: &C,
    accounts: &Accounts,
    amount: Amount,
    route: &BridgeRoute,
) -> ExecResult<PlannedTx>
where
    C: ChainClient + ?Sized,
{
    let pool = client.pool_info(&cfg.hub.pool_addr).await?;
    let lsd_denom = pool.lsd_denom();
    let quote = Some(Quote {
        amount,
        will_receive: Some(amount),
    });

    match route {
        BridgeRoute::FromHub {
            target: chain_id,
            receiver,
        } => {
            let sender = connected(&accounts.hub, "hub")?;
            let target = target(cfg, chain_id)?;
            let ics20 = cfg
                .bridge
                .ics20_contract
                .as_deref()
                .ok_or_else(|| ExecError::MissingRoute("bridge.ics20_contract".to_owned()))?;

            ensure_balance(client, &cfg.hub.chain_id, sender, &lsd_denom, amount).await?;
            let msg = from_hub(
                sender,
                &pool.lsd_token,
                ics20,
                &target.hub_channel,
                receiver,
                amount,
            )?;

            Ok(PlannedTx {
                step: Step::Send,
                chain: cfg.hub.chain_id.clone(),
                sender: sender.to_owned(),
                msgs: vec![msg],
                probe: ConfirmationProbe::Balance {
                    chain: cfg.hub.chain_id.clone(),
                    address: sender.to_owned(),
                    denom: lsd_denom,
                    direction: Direction::Decrease,
                },
                followup: None,
                records: None,
                quote,
            })
        }
        BridgeRoute::ToHub {
            source: chain_id,
            sender,
        } => {
            let receiver = connected(&accounts.hub, "hub")?;
            let target = target(cfg, chain_id)?;

            let denom = bridge_denom(&target.remote_channel, &pool.lsd_token);
            ensure_balance(client, chain_id, sender, &denom, amount).await?;
            let msg = to_hub(
                sender,
                &target.remote_channel,
                &pool.lsd_token,
                receiver,
                amount,
                ibc_timeout_timestamp(cfg)?,
            )?;

            Ok(PlannedTx {
                step: Step::Send,
                chain: chain_id.clone(),
                sender: sender.clone(),
                msgs: vec![msg],
                probe: ConfirmationProbe::Balance {
                    chain: cfg.hub.chain_id.clone(),
                    address: receiver.to_owned(),
                    denom: lsd_denom,
                    direction: Direction::Increase,
                },
                followup: None,
                records: None,
                quote,
            })
        }
    }
}
