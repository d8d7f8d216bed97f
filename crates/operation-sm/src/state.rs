//! The states of the Operation State Machine.

use std::fmt;

use lsd_primitives::types::{Amount, TxHash};
use serde::{Deserialize, Serialize};

use crate::plan::{ConfirmationProbe, PlannedTx, Step};

/// Why an operation attempt ended in an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Failure {
    /// The request could not be planned because a precondition does not hold.
    Precondition {
        /// Human readable description.
        reason: String,
    },

    /// Planning hit an invariant violation, e.g. chain state changed between plan and submit.
    Planning {
        /// Human readable description.
        reason: String,
    },

    /// The chain or the client refused the transaction.
    Broadcast {
        /// The step whose transaction failed.
        step: Step,
        /// Chain-level response code, if any.
        code: Option<i64>,
        /// Raw diagnostic payload.
        detail: String,
    },

    /// The transaction landed but its expected effect was reverted.
    Confirmation {
        /// The step whose effect failed.
        step: Step,
        /// Human readable description.
        reason: String,
    },

    /// The process stopped while the operation was in flight.
    Interrupted,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precondition { reason } => write!(f, "{reason}"),
            Self::Planning { reason } => write!(f, "planning failed: {reason}"),
            Self::Broadcast { step, code, detail } => match code {
                Some(code) => write!(f, "{step} transaction failed with code {code}: {detail}"),
                None => write!(f, "{step} transaction failed: {detail}"),
            },
            Self::Confirmation { step, reason } => {
                write!(f, "{step} transaction did not take effect: {reason}")
            }
            Self::Interrupted => write!(f, "operation was interrupted"),
        }
    }
}

/// The state of a single operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OperationState {
    /// Created but not started.
    Idle,

    /// A plan for the next transaction is being built from fresh chain state.
    Preparing,

    /// A planned transaction has been handed to the signing client.
    AwaitingSignature {
        /// The transaction being signed.
        tx: Box<PlannedTx>,
    },

    /// A transaction was broadcast and its effect is being polled for.
    AwaitingConfirmation {
        /// The step of the transaction.
        step: Step,
        /// Hash of the transaction.
        tx_hash: TxHash,
        /// Value observed by the probe right before the broadcast.
        baseline: Amount,
        /// How the effect is observed.
        probe: ConfirmationProbe,
    },

    /// The final transaction took effect.
    Succeeded {
        /// Hash of the final transaction.
        tx_hash: TxHash,
    },

    /// The poller ran out of attempts. The transaction may still land.
    Unconfirmed {
        /// The step of the transaction.
        step: Step,
        /// Hash of the transaction.
        tx_hash: TxHash,
        /// Value observed by the probe right before the broadcast.
        baseline: Amount,
        /// How the effect is observed.
        probe: ConfirmationProbe,
    },

    /// The current attempt failed.
    Failed {
        /// Why it failed.
        failure: Failure,
    },

    /// The user cancelled or rejected the signature request.
    Cancelled,
}

impl OperationState {
    /// Whether the state machine is waiting on an executor.
    pub const fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::Preparing | Self::AwaitingSignature { .. } | Self::AwaitingConfirmation { .. }
        )
    }

    /// Whether no further event can move the operation.
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// The step currently being worked on, if it is known.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::AwaitingSignature { tx } => Some(tx.step),
            Self::AwaitingConfirmation { step, .. } | Self::Unconfirmed { step, .. } => Some(*step),
            Self::Failed {
                failure:
                    Failure::Broadcast { step, .. } | Failure::Confirmation { step, .. },
            } => Some(*step),
            _ => None,
        }
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Preparing => write!(f, "Preparing"),
            Self::AwaitingSignature { tx } => write!(f, "AwaitingSignature({})", tx.step),
            Self::AwaitingConfirmation { step, tx_hash, .. } => {
                write!(f, "AwaitingConfirmation({step}, {tx_hash})")
            }
            Self::Succeeded { tx_hash } => write!(f, "Succeeded({tx_hash})"),
            Self::Unconfirmed { step, tx_hash, .. } => {
                write!(f, "Unconfirmed({step}, {tx_hash})")
            }
            Self::Failed { failure } => write!(f, "Failed({failure})"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}
