//! Generic state machine infrastructure.
//!
//! This module provides the core abstractions shared by state machines in this workspace,
//! including the generic output type and the trait that all state machines implement.

/// Generic output from any state machine after processing an event.
///
/// - `duties`: Actions that need to be executed externally
/// - `signals`: Messages to be delivered to other components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMOutput<D, S> {
    /// The duties that need to be performed by external executors.
    pub duties: Vec<D>,
    /// The signals that need to be delivered.
    pub signals: Vec<S>,
}

impl<D, S> Default for SMOutput<D, S> {
    fn default() -> Self {
        Self {
            duties: Vec::new(),
            signals: Vec::new(),
        }
    }
}

impl<D, S> SMOutput<D, S> {
    /// Creates a new empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an output with only duties.
    pub const fn with_duties(duties: Vec<D>) -> Self {
        Self {
            duties,
            signals: Vec::new(),
        }
    }

    /// Creates an output with only signals.
    pub const fn with_signals(signals: Vec<S>) -> Self {
        Self {
            duties: Vec::new(),
            signals,
        }
    }

    /// Creates an output with both duties and signals.
    pub const fn with_duties_and_signals(duties: Vec<D>, signals: Vec<S>) -> Self {
        Self { duties, signals }
    }
}

/// Trait for all state machines in the workspace.
///
/// Each implementation specifies its own duty, signal and event types through associated types.
pub trait StateMachine {
    /// The type of duties this state machine can emit.
    type Duty;

    /// The type of signals this state machine can emit.
    type OutgoingSignal;

    /// The type of events this state machine can process.
    type Event;

    /// The error type returned when event processing fails.
    type Error;

    /// Processes an event and returns the output (duties and signals) or an error.
    ///
    /// On error the state machine must be left unchanged.
    fn process_event(
        &mut self,
        event: Self::Event,
    ) -> Result<SMOutput<Self::Duty, Self::OutgoingSignal>, Self::Error>;
}
