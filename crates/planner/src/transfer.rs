//! Builds the IBC transfers that carry native tokens or share tokens to the hub.

use lsd_primitives::{
    msgs::{ChainMsg, StakeHook, WasmMemo, TRANSFER_PORT},
    staking::{LsmShare, TokenizedShareRecord},
    types::Coin,
};

use crate::errors::{PlanError, PlanResult};

/// Route and addressing shared by all transfers to the stake manager.
#[derive(Debug, Clone, Copy)]
pub struct HubRoute<'a> {
    /// Sender on the source chain.
    pub sender: &'a str,

    /// Source chain channel to the hub.
    pub channel: &'a str,

    /// Stake-manager contract receiving the transfer.
    pub stake_manager: &'a str,

    /// Hub account credited with derivative tokens.
    pub hub_address: &'a str,

    /// Pool being staked into.
    pub pool_addr: &'a str,

    /// Absolute timeout in nanoseconds since the unix epoch.
    pub timeout_timestamp: u64,
}

impl HubRoute<'_> {
    fn transfer(&self, token: Coin, hook: StakeHook) -> PlanResult<ChainMsg> {
        let memo = WasmMemo::new(self.stake_manager, hook).to_json()?;
        Ok(ChainMsg::IbcTransfer {
            source_port: TRANSFER_PORT.to_owned(),
            source_channel: self.channel.to_owned(),
            token,
            sender: self.sender.to_owned(),
            receiver: self.stake_manager.to_owned(),
            timeout_timestamp: self.timeout_timestamp,
            memo,
        })
    }

    /// Transfer of native tokens to be staked on arrival.
    pub fn native_stake(&self, token: Coin) -> PlanResult<ChainMsg> {
        self.transfer(
            token,
            StakeHook::Stake {
                neutron_address: self.hub_address.to_owned(),
                pool_addr: self.pool_addr.to_owned(),
            },
        )
    }

    /// Transfer of share tokens to be staked on arrival.
    pub fn share_stake(&self, token: Coin) -> PlanResult<ChainMsg> {
        self.transfer(
            token,
            StakeHook::StakeLsm {
                neutron_address: self.hub_address.to_owned(),
                pool_addr: self.pool_addr.to_owned(),
            },
        )
    }
}

/// Picks the `count` newest records (highest ids), returned in ascending id order.
pub fn newest_records(
    records: &[TokenizedShareRecord],
    count: usize,
) -> PlanResult<Vec<TokenizedShareRecord>> {
    if records.len() < count {
        return Err(PlanError::RecordCountMismatch {
            expected: count,
            found: records.len(),
        });
    }

    let mut sorted = records.to_vec();
    sorted.sort_by_key(|record| record.id);
    Ok(sorted.split_off(sorted.len() - count))
}

/// Builds one share transfer per freshly created record, taking each amount from the owner's
/// balance of the record's share denomination, followed by one transfer per directly sendable
/// share.
pub fn share_transfers(
    route: &HubRoute<'_>,
    records: &[TokenizedShareRecord],
    direct: &[LsmShare],
    balances: &[Coin],
) -> PlanResult<Vec<ChainMsg>> {
    let mut msgs = Vec::with_capacity(records.len() + direct.len());

    for record in records {
        let denom = record.share_denom();
        let balance = balances
            .iter()
            .find(|coin| coin.denom == denom && coin.amount > 0)
            .ok_or(PlanError::ShareBalanceNotFound(denom))?;
        msgs.push(route.share_stake(balance.clone())?);
    }

    for share in direct {
        msgs.push(route.share_stake(Coin::new(share.denom(), share.amount))?);
    }

    Ok(msgs)
}
