//! Routes over which the derivative token can be bridged away from and back to the hub.

use lsd_primitives::types::{Address, ChainId};
use serde::{Deserialize, Serialize};

use crate::errors::ParamsError;

/// Bridge configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeParams {
    /// The cw20-ics20 contract on the hub that escrows derivative tokens.
    #[serde(default)]
    pub ics20_contract: Option<Address>,

    /// Chains the derivative token can be bridged to.
    #[serde(default)]
    pub targets: Vec<BridgeTarget>,
}

/// A chain connected to the hub's cw20-ics20 contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeTarget {
    /// Chain id of the target.
    pub chain_id: ChainId,

    /// Channel on the hub side of the route.
    pub hub_channel: String,

    /// Channel on the target side of the route.
    pub remote_channel: String,
}

impl BridgeParams {
    /// Looks up the route to `chain_id`.
    pub fn target(&self, chain_id: &ChainId) -> Option<&BridgeTarget> {
        self.targets.iter().find(|t| &t.chain_id == chain_id)
    }

    pub(crate) fn validate(&self) -> Result<(), ParamsError> {
        if !self.targets.is_empty() && self.ics20_contract.is_none() {
            return Err(ParamsError::Invalid(
                "bridge targets require bridge.ics20_contract".into(),
            ));
        }
        for (i, target) in self.targets.iter().enumerate() {
            if self.targets[..i]
                .iter()
                .any(|other| other.chain_id == target.chain_id)
            {
                return Err(ParamsError::Invalid(format!(
                    "duplicate bridge target {}",
                    target.chain_id
                )));
            }
        }
        Ok(())
    }
}
