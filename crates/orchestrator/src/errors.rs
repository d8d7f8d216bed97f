//! Error types for the orchestrator crate.

use lsd_ledger::LedgerError;
use lsd_operation_sm::{errors::OSMError, events::OperationEvent};
use lsd_primitives::types::OpId;
use thiserror::Error;

/// Error emitted when processing an event for a registered operation.
#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    /// The operation is not in the registry.
    #[error("operation {0} not found in the registry")]
    NotFound(OpId),

    /// The outcome was reported by a driver that a later request has superseded.
    #[error("outcome for operation {0} comes from a superseded driver")]
    Stale(OpId),

    /// The event is not valid in the operation's current state. Points at a driver bug.
    #[error("invalid event for operation {0}: {1}")]
    InvalidEvent(OpId, String),

    /// The event was already applied.
    #[error("duplicate event {1} for operation {0}")]
    DuplicateEvent(OpId, Box<OperationEvent>),

    /// The state machine refused the event, for example a cancellation after the point of no
    /// return.
    #[error("event {1} rejected by operation {0}: {2}")]
    EventRejected(OpId, Box<OperationEvent>, String),
}

impl ProcessError {
    pub(crate) fn from_osm(op_id: OpId, err: OSMError) -> Self {
        match err {
            OSMError::InvalidEvent { .. } => Self::InvalidEvent(op_id, err.to_string()),
            OSMError::Duplicate { event, .. } => Self::DuplicateEvent(op_id, event),
            OSMError::Rejected { event, reason, .. } => Self::EventRejected(op_id, event, reason),
        }
    }
}

/// The result of processing an event through the registry.
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Errors returned by the [`Orchestrator`](crate::Orchestrator) API.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// No operation with this id is registered or stored in the notice ledger.
    #[error("operation {0} not found")]
    NotFound(OpId),

    /// The stored notice carries nothing that can be resumed.
    #[error("operation {0} cannot be resumed")]
    NotResumable(OpId),

    /// The state machine refused the request.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// The notice ledger failed.
    #[error("notice ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// The result type of the orchestrator API.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
