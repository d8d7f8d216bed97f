//! Notices: the persisted history entry of an operation.

use std::fmt;

use chrono::{DateTime, Utc};
use lsd_primitives::{
    msgs::ChainMsg,
    types::{Amount, OpId, OperationKind, TxHash},
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::{
    operation::TxHashes,
    plan::{ConfirmationProbe, Quote, ResumePoint, Step},
    request::OperationRequest,
    state::Failure,
};

/// Status shown for an operation in the notice history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeStatus {
    /// Still in progress.
    Pending,
    /// Completed.
    Confirmed,
    /// Failed; may be retried.
    Error,
    /// Abandoned by the user after a transaction was broadcast.
    Cancelled,
    /// Submitted, but the effect was never observed.
    Unconfirmed,
}

impl fmt::Display for NoticeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
            Self::Unconfirmed => "unconfirmed",
        };
        f.write_str(s)
    }
}

/// A broadcast transaction whose effect has not been observed yet.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    /// The step of the transaction.
    pub step: Step,

    /// Hash of the transaction.
    pub tx_hash: TxHash,

    /// Value observed by the probe right before the broadcast.
    #[serde_as(as = "DisplayFromStr")]
    pub baseline: Amount,

    /// How the effect is observed.
    pub probe: ConfirmationProbe,
}

/// Everything needed to rebuild the operation's state machine later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeProgress {
    /// The original request.
    pub request: OperationRequest,

    /// Where a retry re-enters.
    pub resume: ResumePoint,

    /// Steps of the operation as known so far.
    pub steps: Vec<Step>,

    /// Hashes of broadcast transactions.
    pub tx_hashes: TxHashes,

    /// Messages of the last planned transaction.
    pub pending_msgs: Vec<ChainMsg>,

    /// The failure of the last attempt, if it failed.
    pub failure: Option<Failure>,

    /// Quote of the last plan.
    pub quote: Option<Quote>,

    /// The transaction still being confirmed, if any.
    #[serde(default)]
    pub confirmation: Option<PendingConfirmation>,
}

/// An entry in the notice ledger.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Equal to the operation id.
    pub id: OpId,

    /// Kind of the operation.
    pub kind: OperationKind,

    /// Current status.
    pub status: NoticeStatus,

    /// Amount moved by the operation.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,

    /// What the user is expected to receive.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub will_receive: Option<Amount>,

    /// The most recent transaction hash.
    pub tx_hash: Option<TxHash>,

    /// Display message.
    pub message: Option<String>,

    /// Resume data.
    pub progress: Option<NoticeProgress>,

    /// Time of the first insertion into the ledger. Assigned by the ledger.
    pub timestamp: Option<DateTime<Utc>>,
}
