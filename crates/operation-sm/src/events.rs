//! The events that drive the Operation State Machine.

use std::fmt;

use lsd_primitives::types::{Amount, TxHash};
use serde::{Deserialize, Serialize};

use crate::{
    plan::{PlannedTx, Step},
    state::Failure,
};

/// Events processed by the Operation State Machine.
///
/// `Start`, `Cancel`, `Retry` and `Recheck` originate from the user. Every other event reports
/// the outcome of a duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OperationEvent {
    /// Begin the operation.
    Start,

    /// The next transaction has been planned.
    Planned(Box<PlannedTx>),

    /// No valid plan exists right now.
    PlanningFailed {
        /// Why planning failed.
        failure: Failure,
    },

    /// The user declined to sign.
    UserRejected {
        /// The step the user declined.
        step: Step,
    },

    /// The transaction was refused by the client or the chain.
    BroadcastFailed {
        /// The step that failed.
        step: Step,
        /// Chain-level response code, if any.
        code: Option<i64>,
        /// Raw diagnostic payload.
        detail: String,
    },

    /// The transaction was accepted by the chain.
    Broadcast {
        /// The step that was broadcast.
        step: Step,
        /// Hash of the transaction.
        tx_hash: TxHash,
        /// Value observed by the probe right before the broadcast.
        baseline: Amount,
    },

    /// The poller observed the expected effect.
    Confirmed {
        /// The confirmed step.
        step: Step,
        /// Hash of the confirmed transaction.
        tx_hash: TxHash,
    },

    /// The poller observed that the effect was reverted.
    ConfirmationFailed {
        /// The failed step.
        step: Step,
        /// Hash of the failed transaction.
        tx_hash: TxHash,
        /// What was observed.
        reason: String,
    },

    /// The poller ran out of attempts.
    ConfirmationTimedOut {
        /// The step being polled.
        step: Step,
        /// Hash of the transaction being polled.
        tx_hash: TxHash,
    },

    /// The user wants to abandon the operation.
    Cancel,

    /// The user wants to try again from the last resume point.
    Retry,

    /// The user wants to poll an unconfirmed transaction again.
    Recheck,
}

impl fmt::Display for OperationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Planned(tx) => write!(f, "Planned({}, {} msgs)", tx.step, tx.msgs.len()),
            Self::PlanningFailed { failure } => write!(f, "PlanningFailed({failure})"),
            Self::UserRejected { step } => write!(f, "UserRejected({step})"),
            Self::BroadcastFailed { step, code, .. } => {
                write!(f, "BroadcastFailed({step}, code: {code:?})")
            }
            Self::Broadcast { step, tx_hash, .. } => write!(f, "Broadcast({step}, {tx_hash})"),
            Self::Confirmed { step, tx_hash } => write!(f, "Confirmed({step}, {tx_hash})"),
            Self::ConfirmationFailed { step, tx_hash, .. } => {
                write!(f, "ConfirmationFailed({step}, {tx_hash})")
            }
            Self::ConfirmationTimedOut { step, tx_hash } => {
                write!(f, "ConfirmationTimedOut({step}, {tx_hash})")
            }
            Self::Cancel => write!(f, "Cancel"),
            Self::Retry => write!(f, "Retry"),
            Self::Recheck => write!(f, "Recheck"),
        }
    }
}
