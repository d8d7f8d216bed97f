//! Chain messages handed to the signing client, and the contract payloads they carry.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::types::{Address, Amount, Coin, UnstakeIndex};

/// IBC port used by every transfer the orchestrator builds.
pub const TRANSFER_PORT: &str = "transfer";

/// A single message within a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type_url", content = "value")]
pub enum ChainMsg {
    /// Moves a delegation from one validator to another without unbonding.
    #[serde(rename = "/cosmos.staking.v1beta1.MsgBeginRedelegate")]
    BeginRedelegate {
        /// Owner of the delegation.
        delegator_address: Address,
        /// Validator the delegation currently sits with.
        validator_src_address: Address,
        /// Validator the delegation moves to.
        validator_dst_address: Address,
        /// Amount to move.
        amount: Coin,
    },

    /// Converts delegation shares into a transferable share token.
    #[serde(rename = "/gaia.liquid.v1beta1.MsgTokenizeShares")]
    TokenizeShares {
        /// Owner of the delegation.
        delegator_address: Address,
        /// Validator of the delegation.
        validator_address: Address,
        /// Amount to tokenize.
        amount: Coin,
        /// Owner of the resulting tokenize-share record.
        tokenized_share_owner: Address,
    },

    /// Converts a share token back into a delegation.
    #[serde(rename = "/gaia.liquid.v1beta1.MsgRedeemTokensForShares")]
    RedeemTokensForShares {
        /// Holder of the share tokens.
        delegator_address: Address,
        /// Share tokens to redeem.
        amount: Coin,
    },

    /// Sends tokens to another chain over IBC.
    #[serde(rename = "/ibc.applications.transfer.v1.MsgTransfer")]
    IbcTransfer {
        /// Source port, always [`TRANSFER_PORT`].
        source_port: String,
        /// Source channel.
        source_channel: String,
        /// Tokens to send.
        token: Coin,
        /// Sender on the source chain.
        sender: Address,
        /// Receiver on the destination chain.
        receiver: Address,
        /// Absolute timeout in nanoseconds since the unix epoch.
        timeout_timestamp: u64,
        /// Memo forwarded to the destination, used for wasm hooks.
        memo: String,
    },

    /// Executes a cosmwasm contract.
    #[serde(rename = "/cosmwasm.wasm.v1.MsgExecuteContract")]
    ExecuteContract {
        /// Signer of the execution.
        sender: Address,
        /// Contract to execute.
        contract: Address,
        /// JSON execute message.
        msg: serde_json::Value,
        /// Funds attached to the execution.
        funds: Vec<Coin>,
    },
}

impl ChainMsg {
    /// Builds an [`ChainMsg::ExecuteContract`] from a typed execute message.
    pub fn execute<M: Serialize>(
        sender: impl Into<Address>,
        contract: impl Into<Address>,
        msg: &M,
        funds: Vec<Coin>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::ExecuteContract {
            sender: sender.into(),
            contract: contract.into(),
            msg: serde_json::to_value(msg)?,
            funds,
        })
    }

    /// Whether this message converts delegation shares into a share token.
    pub const fn is_tokenize(&self) -> bool {
        matches!(self, Self::TokenizeShares { .. })
    }
}

impl fmt::Display for ChainMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeginRedelegate {
                validator_src_address,
                validator_dst_address,
                amount,
                ..
            } => write!(
                f,
                "BeginRedelegate {amount} {validator_src_address} -> {validator_dst_address}"
            ),
            Self::TokenizeShares {
                validator_address,
                amount,
                ..
            } => write!(f, "TokenizeShares {amount} of {validator_address}"),
            Self::RedeemTokensForShares { amount, .. } => {
                write!(f, "RedeemTokensForShares {amount}")
            }
            Self::IbcTransfer {
                source_channel,
                token,
                receiver,
                ..
            } => write!(f, "IbcTransfer {token} via {source_channel} to {receiver}"),
            Self::ExecuteContract { contract, .. } => write!(f, "ExecuteContract on {contract}"),
        }
    }
}

/// Hook executed by the hub when an IBC transfer carrying it arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeHook {
    /// Stake the received native tokens.
    Stake {
        /// Hub account receiving the derivative tokens.
        neutron_address: Address,
        /// Pool to stake into.
        pool_addr: Address,
    },

    /// Stake the received share tokens.
    StakeLsm {
        /// Hub account receiving the derivative tokens.
        neutron_address: Address,
        /// Pool to stake into.
        pool_addr: Address,
    },
}

/// Memo wrapper understood by the hub's IBC wasm hooks middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasmMemo {
    /// The hook invocation.
    pub wasm: WasmHook,
}

/// Contract call performed by the wasm hooks middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasmHook {
    /// Contract to invoke.
    pub contract: Address,
    /// Execute message.
    pub msg: StakeHook,
}

impl WasmMemo {
    /// Creates a memo invoking `hook` on `contract`.
    pub fn new(contract: impl Into<Address>, hook: StakeHook) -> Self {
        Self {
            wasm: WasmHook {
                contract: contract.into(),
                msg: hook,
            },
        }
    }

    /// Serializes the memo to the JSON string placed in the transfer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Execute messages of the stake-manager contract.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeManagerMsg {
    /// Burn derivative tokens and create an unstake record.
    Unstake {
        /// Amount of derivative tokens.
        #[serde_as(as = "DisplayFromStr")]
        amount: Amount,
        /// Pool to unstake from.
        pool_addr: Address,
    },

    /// Claim matured unstake records.
    Withdraw {
        /// Pool the records belong to.
        pool_addr: Address,
        /// Source chain address receiving the tokens.
        receiver: Address,
        /// Indices of the records to claim.
        #[serde_as(as = "Vec<DisplayFromStr>")]
        unstake_index_list: Vec<UnstakeIndex>,
    },
}

/// Execute messages of a cw20 token contract.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cw20Msg {
    /// Raise the allowance of `spender`.
    IncreaseAllowance {
        /// Account allowed to spend.
        spender: Address,
        /// Additional allowance.
        #[serde_as(as = "DisplayFromStr")]
        amount: Amount,
    },

    /// Send tokens to a contract together with a base64 encoded hook message.
    Send {
        /// Receiving contract.
        contract: Address,
        /// Amount to send.
        #[serde_as(as = "DisplayFromStr")]
        amount: Amount,
        /// Base64 encoded JSON hook message.
        msg: String,
    },
}

/// Hook message understood by the cw20-ics20 contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ics20TransferMsg {
    /// Channel to send over.
    pub channel: String,
    /// Receiver on the remote chain.
    pub remote_address: Address,
}
