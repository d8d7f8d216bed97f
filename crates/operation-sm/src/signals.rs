//! Signals emitted by the Operation State Machine.

use crate::notice::Notice;

/// Messages the state machine asks to be delivered outside of itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationSignal {
    /// The operation's notice changed and must be written to the notice ledger.
    Notice(Box<Notice>),
}
