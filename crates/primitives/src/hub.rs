//! State exposed by the hub chain's stake-manager contract.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::{
    decimal::Dec,
    types::{Address, Amount, Coin, Era, UnstakeIndex},
};

/// The liquid-staking pool as reported by the stake manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    /// Address of the pool on the source chain.
    pub pool_addr: Address,

    /// Address of the cw20 derivative token contract on the hub.
    pub lsd_token: Address,

    /// Current era of the pool.
    pub era: Era,

    /// Number of eras an unstake record must wait before it can be withdrawn.
    pub unbonding_period: u64,

    /// Duration of an era in seconds.
    pub era_seconds: u64,

    /// Exchange rate: staking tokens per derivative token.
    pub rate: Dec,

    /// Validators the pool currently delegates to.
    pub validator_addrs: Vec<Address>,
}

impl PoolInfo {
    /// The denomination under which the derivative token balance is queried.
    pub fn lsd_denom(&self) -> String {
        cw20_denom(&self.lsd_token)
    }
}

/// Denomination used to query the balance of a cw20 token contract.
pub fn cw20_denom(contract: &str) -> String {
    format!("cw20:{contract}")
}

/// Lifecycle of an unstake record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnstakeStatus {
    /// Waiting for unbonding; a failed withdrawal also reverts records to this status.
    Default,

    /// Withdrawal has been requested and is being relayed.
    WithdrawPending,
}

/// A pending claim created by unstaking derivative tokens.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstakeRecord {
    /// Index of the record within the user's records.
    pub index: UnstakeIndex,

    /// Pool the record belongs to.
    pub pool_addr: Address,

    /// Amount of staking tokens to be withdrawn.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,

    /// Era in which the record was created.
    pub era: Era,

    /// Current status of the record.
    pub status: UnstakeStatus,
}

/// Relayer fees attached to an interchain withdrawal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee paid for relaying the receive packet.
    #[serde(default)]
    pub recv_fee: Vec<Coin>,

    /// Fee paid for relaying the acknowledgement.
    #[serde(default)]
    pub ack_fee: Vec<Coin>,

    /// Fee paid for relaying the timeout.
    #[serde(default)]
    pub timeout_fee: Vec<Coin>,
}

impl FeeSchedule {
    /// Sums all fee components denominated in `denom`, saturating on overflow.
    pub fn total(&self, denom: &str) -> Amount {
        self.recv_fee
            .iter()
            .chain(&self.ack_fee)
            .chain(&self.timeout_fee)
            .filter(|coin| coin.denom == denom)
            .fold(0, |acc: Amount, coin| acc.saturating_add(coin.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_total_only_counts_requested_denom() {
        let fees = FeeSchedule {
            recv_fee: vec![Coin::new("untrn", 1000)],
            ack_fee: vec![Coin::new("untrn", 2000), Coin::new("uatom", 7)],
            timeout_fee: vec![Coin::new("untrn", 500)],
        };
        assert_eq!(fees.total("untrn"), 3500);
        assert_eq!(fees.total("uatom"), 7);
        assert_eq!(FeeSchedule::default().total("untrn"), 0);
    }
}
