//! Parameters of the source chain and the hub.

use lsd_primitives::types::{Address, Amount, ChainId};
use serde::{Deserialize, Serialize};

/// The chain on which users hold native stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceChainParams {
    /// Chain id used by the signing client.
    pub chain_id: ChainId,

    /// Native staking denomination.
    pub staking_denom: String,

    /// IBC channel from the source chain to the hub used for staking transfers.
    ///
    /// Operations that transfer to the hub fail their preconditions when this is absent.
    #[serde(default)]
    pub stake_channel: Option<String>,
}

/// The hub chain running the stake-manager contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubParams {
    /// Chain id used by the signing client.
    pub chain_id: ChainId,

    /// Denomination in which relayer fees are paid.
    pub fee_denom: String,

    /// Address of the stake-manager contract.
    pub stake_manager: Address,

    /// Address of the pool on the source chain.
    pub pool_addr: Address,

    /// Fee-denom balance that must remain after paying withdrawal fees.
    #[serde(default, with = "amount_str")]
    pub min_fee_reserve: Amount,
}

mod amount_str {
    use lsd_primitives::types::Amount;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(amount: &Amount, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(amount)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Amount, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
