//! Errors related to the state transitions in the Operation State Machine.

use thiserror::Error;

use crate::{events::OperationEvent, state::OperationState};

/// Errors that can occur in the Operation State Machine.
#[derive(Debug, Clone, Error)]
pub enum OSMError {
    /// An invalid event was received for the current state.
    ///
    /// This usually points at a bug in the driver feeding events.
    #[error("Received invalid event {event} in state {state}; reason: {reason:?}")]
    InvalidEvent {
        /// The state in which the event was received.
        state: Box<OperationState>,
        /// The invalid event that was received.
        event: Box<OperationEvent>,
        /// The reason for the invalidity.
        reason: Option<String>,
    },

    /// A duplicate event was received in the current state.
    #[error("Received a duplicate event {event} in state {state}")]
    Duplicate {
        /// The state in which the duplicate event was received.
        state: Box<OperationState>,
        /// The duplicate event that was received.
        event: Box<OperationEvent>,
    },

    /// An event was rejected in the current state.
    ///
    /// This is the expected outcome of user requests that are not allowed right now, such as
    /// cancelling after the point of no return.
    #[error("Event {event} rejected in state: {state}, reason: {reason}")]
    Rejected {
        /// The state in which the event was rejected.
        state: Box<OperationState>,
        /// The reason for the rejection.
        reason: String,
        /// The rejected event.
        event: Box<OperationEvent>,
    },
}

impl OSMError {
    pub(crate) fn invalid_event(
        state: OperationState,
        event: OperationEvent,
        reason: Option<String>,
    ) -> Self {
        Self::InvalidEvent {
            state: Box::new(state),
            event: Box::new(event),
            reason,
        }
    }

    pub(crate) fn duplicate(state: OperationState, event: OperationEvent) -> Self {
        Self::Duplicate {
            state: Box::new(state),
            event: Box::new(event),
        }
    }

    pub(crate) fn rejected(
        state: OperationState,
        event: OperationEvent,
        reason: impl Into<String>,
    ) -> Self {
        Self::Rejected {
            state: Box::new(state),
            reason: reason.into(),
            event: Box::new(event),
        }
    }
}

/// The result type for operations in the Operation State Machine.
pub type OSMResult<T> = Result<T, OSMError>;
