//! Records returned by the source chain's staking and liquid-staking modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::{
    decimal::{BondFactor, Dec},
    types::{Address, Amount, Coin, RecordId},
};

/// Point-in-time view of a validator, including the liquid-staking parameters that govern
/// whether it may accept more liquid stake.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSnapshot {
    /// Operator address of the validator.
    pub operator_address: Address,

    /// Tokens bonded to the validator.
    #[serde_as(as = "DisplayFromStr")]
    pub tokens: Amount,

    /// Total delegator shares issued by the validator.
    pub delegator_shares: Dec,

    /// Shares currently held by liquid-staking providers.
    pub liquid_shares: Dec,

    /// Shares marked as validator bond.
    pub validator_bond_shares: Dec,

    /// Chain-wide validator bond factor.
    pub bond_factor: BondFactor,

    /// Chain-wide maximum fraction of a validator's shares that may be liquid.
    pub liquid_staking_cap: Dec,
}

impl ValidatorSnapshot {
    /// Converts delegator shares of this validator into tokens, rounding down.
    ///
    /// Returns `None` if the validator has no shares or the result overflows.
    pub fn shares_to_tokens(&self, shares: Amount) -> Option<Amount> {
        if self.delegator_shares.is_zero() {
            return None;
        }
        let scaled = ethnum::U256::from(shares)
            * ethnum::U256::from(self.tokens)
            * ethnum::U256::from(crate::decimal::DEC_ONE_RAW)
            / self.delegator_shares.wide();
        crate::decimal::narrow(scaled)
    }
}

/// A user's delegation to a single validator.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationRecord {
    /// Address of the delegator.
    pub delegator: Address,

    /// Operator address of the validator.
    pub validator: Address,

    /// Balance of the delegation in the staking denomination.
    pub balance: Coin,

    /// Whether the delegation is flagged as validator bond, in which case it cannot be tokenized.
    #[serde(default)]
    pub validator_bond: bool,
}

/// A tokenize-share record, created when delegation shares are converted into a transferable
/// share token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedShareRecord {
    /// Record identifier, unique per chain.
    pub id: RecordId,

    /// Current owner of the record.
    pub owner: Address,

    /// Module account holding the underlying delegation.
    pub module_account: Address,

    /// Validator the underlying delegation is bonded to.
    pub validator: Address,
}

impl TokenizedShareRecord {
    /// The denomination of the share token minted for this record.
    pub fn share_denom(&self) -> String {
        share_denom(&self.validator, self.id)
    }
}

/// Builds the `<validator>/<record id>` denomination of a share token.
pub fn share_denom(validator: &str, id: RecordId) -> String {
    format!("{validator}/{id}")
}

/// A share token held by the user, as selected for an LSM redelegation.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsmShare {
    /// Validator the share token is backed by.
    pub validator: Address,

    /// Record the share token was minted from.
    pub record_id: RecordId,

    /// Amount of share tokens.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,
}

impl LsmShare {
    /// The denomination of this share token.
    pub fn denom(&self) -> String {
        share_denom(&self.validator, self.record_id)
    }
}

/// Whether an account is currently allowed to tokenize shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TokenizeShareLock {
    /// Tokenization is allowed.
    Unlocked,

    /// Tokenization has been disabled by the account owner.
    Locked,

    /// Tokenization was re-enabled and becomes available at the given time.
    LockExpiring {
        /// When tokenization becomes available again.
        unlock_time: DateTime<Utc>,
    },
}
