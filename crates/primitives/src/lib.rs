//! This crate contains general types and pure functions that need to be shared across
//! multiple crates of the liquid-staking orchestrator.
//!
//! It is not intended to be used directly by end users, but rather to be used as a dependency by
//! other crates. Also note that this crate lies at the bottom of the crate-hierarchy in this
//! workspace i.e., it does not depend on any other crate in this workspace.

pub mod decimal;
pub mod errors;
pub mod hub;
pub mod msgs;
pub mod staking;
pub mod tx;
pub mod types;

/// Commonly used types re-exported for convenience.
pub mod prelude {
    pub use crate::{
        decimal::{BondFactor, Dec},
        hub::{FeeSchedule, PoolInfo, UnstakeRecord, UnstakeStatus},
        msgs::ChainMsg,
        staking::{
            DelegationRecord, LsmShare, TokenizeShareLock, TokenizedShareRecord, ValidatorSnapshot,
        },
        tx::TxResponse,
        types::{Address, Amount, ChainId, Coin, OpId, OperationKind, TxHash},
    };
}
