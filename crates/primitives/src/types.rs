//! Basic identifiers and value types shared by every crate in the workspace.

use std::{fmt, str::FromStr};

use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::errors::ParseError;

/// Token quantity in the smallest unit of its denomination.
pub type Amount = u128;

/// Bech32 account, contract or validator address.
pub type Address = String;

/// Epoch counter of the liquid-staking pool.
pub type Era = u64;

/// Identifier of a tokenize-share record on the source chain.
pub type RecordId = u64;

/// Index of an unstake record on the hub.
pub type UnstakeIndex = u64;

/// Identifier of a chain as used by the signing client.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Creates a new [`ChainId`].
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the chain id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// An amount of a single denomination.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// The denomination, e.g. `uatom`, `cw20:<addr>` or `<validator>/<record id>`.
    pub denom: String,

    /// The amount, serialized as a decimal string.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,
}

impl Coin {
    /// Creates a new [`Coin`].
    pub fn new(denom: impl Into<String>, amount: Amount) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Hash of a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    /// Creates a new [`TxHash`].
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque, unique identifier of an operation.
///
/// Doubles as the key of the operation's notice in the notice ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpId([u8; 16]);

impl OpId {
    /// Generates a fresh random id.
    pub fn random() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Creates an id from raw bytes.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for OpId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ParseError::InvalidOpId(s.to_owned()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for OpId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OpId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The kinds of user-initiated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Native tokens transferred to the hub and staked.
    Stake,
    /// Derivative tokens burned in exchange for an unstake record.
    Unstake,
    /// Existing delegations tokenized and moved to the hub.
    RedelegateStaked,
    /// Already-tokenized shares moved to the hub.
    RedelegateLsm,
    /// Matured unstake records claimed.
    Withdraw,
    /// Derivative tokens moved between the hub and another chain.
    Bridge,
}

impl OperationKind {
    /// Whether the operation may involve two user-signed transactions.
    pub const fn is_two_step(&self) -> bool {
        matches!(self, Self::RedelegateStaked | Self::RedelegateLsm)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stake => "stake",
            Self::Unstake => "unstake",
            Self::RedelegateStaked => "redelegate_staked",
            Self::RedelegateLsm => "redelegate_lsm",
            Self::Withdraw => "withdraw",
            Self::Bridge => "bridge",
        };
        f.write_str(s)
    }
}

impl FromStr for OperationKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "stake" => Self::Stake,
            "unstake" => Self::Unstake,
            "redelegate_staked" => Self::RedelegateStaked,
            "redelegate_lsm" => Self::RedelegateLsm,
            "withdraw" => Self::Withdraw,
            "bridge" => Self::Bridge,
            other => return Err(ParseError::UnknownKind(other.to_owned())),
        })
    }
}
