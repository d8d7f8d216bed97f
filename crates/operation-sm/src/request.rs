//! The user input that starts an operation.

use lsd_primitives::{
    staking::LsmShare,
    types::{Address, Amount, ChainId, OperationKind},
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// The accounts the user has connected, one per chain family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accounts {
    /// Account on the source chain.
    pub source: Option<Address>,

    /// Account on the hub chain.
    pub hub: Option<Address>,
}

/// Direction of a bridge transfer of the derivative token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeRoute {
    /// From the hub to a configured target chain.
    FromHub {
        /// The target chain.
        target: ChainId,
        /// The receiver on the target chain.
        receiver: Address,
    },

    /// From a configured target chain back to the hub.
    ToHub {
        /// The chain currently holding the tokens.
        source: ChainId,
        /// The sender on that chain.
        sender: Address,
    },
}

/// Kind-specific arguments of an operation.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationArgs {
    /// Stake native tokens.
    Stake {
        /// Amount of native tokens.
        #[serde_as(as = "DisplayFromStr")]
        amount: Amount,
    },

    /// Burn derivative tokens for an unstake record.
    Unstake {
        /// Amount of derivative tokens.
        #[serde_as(as = "DisplayFromStr")]
        amount: Amount,
    },

    /// Convert existing delegations.
    RedelegateStaked {
        /// Amount of delegated tokens to convert.
        #[serde_as(as = "DisplayFromStr")]
        amount: Amount,
    },

    /// Convert already tokenized shares.
    RedelegateLsm {
        /// The share positions to send.
        shares: Vec<LsmShare>,
    },

    /// Claim every matured unstake record.
    Withdraw,

    /// Move derivative tokens across chains.
    Bridge {
        /// Amount of derivative tokens.
        #[serde_as(as = "DisplayFromStr")]
        amount: Amount,
        /// Direction of the transfer.
        route: BridgeRoute,
    },
}

/// Everything needed to plan an operation from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRequest {
    /// Connected accounts.
    pub accounts: Accounts,

    /// Kind-specific arguments.
    pub args: OperationArgs,
}

impl OperationRequest {
    /// Creates a new request.
    pub const fn new(accounts: Accounts, args: OperationArgs) -> Self {
        Self { accounts, args }
    }

    /// The kind of operation this request starts.
    pub const fn kind(&self) -> OperationKind {
        match &self.args {
            OperationArgs::Stake { .. } => OperationKind::Stake,
            OperationArgs::Unstake { .. } => OperationKind::Unstake,
            OperationArgs::RedelegateStaked { .. } => OperationKind::RedelegateStaked,
            OperationArgs::RedelegateLsm { .. } => OperationKind::RedelegateLsm,
            OperationArgs::Withdraw => OperationKind::Withdraw,
            OperationArgs::Bridge { .. } => OperationKind::Bridge,
        }
    }

    /// The amount the user asked for.
    ///
    /// Withdrawals claim whatever has matured, so their amount is only known after planning and
    /// this returns zero for them.
    pub fn requested_amount(&self) -> Amount {
        match &self.args {
            OperationArgs::Stake { amount }
            | OperationArgs::Unstake { amount }
            | OperationArgs::RedelegateStaked { amount }
            | OperationArgs::Bridge { amount, .. } => *amount,
            OperationArgs::RedelegateLsm { shares } => shares
                .iter()
                .fold(0, |acc: Amount, share| acc.saturating_add(share.amount)),
            OperationArgs::Withdraw => 0,
        }
    }
}
