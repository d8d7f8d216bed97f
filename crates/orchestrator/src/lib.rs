//! The outermost layer of the liquid-staking orchestrator. It is responsible for:
//!
//! - Keeping every operation started in this process in a registry, together with a watchable
//!   snapshot of its progress.
//! - Feeding user requests (start, retry, recheck, cancel) to the operation's state machine.
//! - Driving each operation by dispatching the duties its state machine emits to the executors and
//!   feeding their outcomes back, one operation per task.
//! - Writing the notices the state machines emit to the notice ledger, and rebuilding operations
//!   from it when they are no longer registered.

mod driver;
pub mod errors;
pub mod orchestrator;
pub mod persister;
pub mod registry;

pub use errors::{OrchestratorError, OrchestratorResult, ProcessError};
pub use orchestrator::Orchestrator;

#[cfg(test)]
mod tests;
