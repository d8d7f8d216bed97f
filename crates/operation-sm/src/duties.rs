//! The duties emitted by the Operation State Machine.

use std::fmt;

use lsd_primitives::types::{Amount, OpId, TxHash};

use crate::{
    plan::{ConfirmationProbe, PlannedTx, ResumePoint, Step},
    request::OperationRequest,
};

/// Work the state machine needs an executor to perform.
///
/// Each duty is answered by exactly one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationDuty {
    /// Query fresh chain state and plan the next transaction.
    ///
    /// Answered by [`Planned`](crate::events::OperationEvent::Planned) or
    /// [`PlanningFailed`](crate::events::OperationEvent::PlanningFailed).
    Plan {
        /// The operation.
        op_id: OpId,
        /// The original request.
        request: OperationRequest,
        /// Where the plan starts.
        resume: ResumePoint,
    },

    /// Hand a transaction to the signing client.
    ///
    /// Answered by `Broadcast`, `BroadcastFailed` or `UserRejected`.
    Submit {
        /// The operation.
        op_id: OpId,
        /// The transaction.
        tx: Box<PlannedTx>,
    },

    /// Poll until the effect of a transaction is observed.
    ///
    /// Answered by `Confirmed`, `ConfirmationFailed` or `ConfirmationTimedOut`.
    AwaitConfirmation {
        /// The operation.
        op_id: OpId,
        /// The step being confirmed.
        step: Step,
        /// Hash of the transaction.
        tx_hash: TxHash,
        /// Value observed right before the broadcast.
        baseline: Amount,
        /// How the effect is observed.
        probe: ConfirmationProbe,
    },
}

impl OperationDuty {
    /// The operation this duty belongs to.
    pub const fn op_id(&self) -> OpId {
        match self {
            Self::Plan { op_id, .. }
            | Self::Submit { op_id, .. }
            | Self::AwaitConfirmation { op_id, .. } => *op_id,
        }
    }
}

impl fmt::Display for OperationDuty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plan { resume, .. } => match resume.next_step() {
                Some(step) => write!(f, "Plan({step})"),
                None => write!(f, "Plan"),
            },
            Self::Submit { tx, .. } => write!(f, "Submit({})", tx.step),
            Self::AwaitConfirmation { step, tx_hash, .. } => {
                write!(f, "AwaitConfirmation({step}, {tx_hash})")
            }
        }
    }
}
