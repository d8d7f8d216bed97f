//! Read-only snapshots of an operation, as handed to callers.

use lsd_primitives::{
    msgs::ChainMsg,
    types::{Amount, OpId, OperationKind, TxHash},
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::plan::{ResumePoint, Step};

/// Hashes of the transactions broadcast for an operation, one per step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHashes {
    /// The preparation transaction.
    pub prepare: Option<TxHash>,

    /// The final transaction.
    pub send: Option<TxHash>,
}

impl TxHashes {
    /// The hash recorded for `step`.
    pub const fn get(&self, step: Step) -> Option<&TxHash> {
        match step {
            Step::Prepare => self.prepare.as_ref(),
            Step::Send => self.send.as_ref(),
        }
    }

    /// Records the hash of `step`.
    pub fn set(&mut self, step: Step, tx_hash: TxHash) {
        match step {
            Step::Prepare => self.prepare = Some(tx_hash),
            Step::Send => self.send = Some(tx_hash),
        }
    }

    /// The most recently broadcast hash.
    pub fn latest(&self) -> Option<&TxHash> {
        self.send.as_ref().or(self.prepare.as_ref())
    }

    /// Whether nothing has been broadcast yet.
    pub const fn is_empty(&self) -> bool {
        self.prepare.is_none() && self.send.is_none()
    }
}

/// Coarse status of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// Not started.
    Idle,
    /// Work is in progress.
    Loading,
    /// Completed.
    Success,
    /// The last attempt failed.
    Error,
    /// Broadcast but not observed; may still land.
    SubmittedUnconfirmed,
    /// Abandoned by the user.
    Cancelled,
}

/// Immutable snapshot of an operation.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Stable identifier, reused across retries.
    pub op_id: OpId,

    /// Kind of operation.
    pub kind: OperationKind,

    /// Amount moved.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,

    /// What the user is expected to receive.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub will_receive: Option<Amount>,

    /// The step being worked on.
    pub step: Option<Step>,

    /// All steps of the operation as known so far.
    pub steps: Vec<Step>,

    /// Coarse status.
    pub status: OperationStatus,

    /// The state machine's current state, for display.
    pub phase: String,

    /// Display message.
    pub message: Option<String>,

    /// Transaction hashes per step.
    pub tx_hashes: TxHashes,

    /// Messages of the last planned transaction.
    pub pending_msgs: Vec<ChainMsg>,

    /// Where a retry re-enters.
    pub resume: ResumePoint,
}
