//! This crate implements the state machine that drives a single liquid-staking operation.
//!
//! The state machine is pure: it reacts to events reported by executors, emits duties that need
//! to be executed externally (planning, signing, polling) and signals notice updates that must be
//! persisted. It never talks to a chain itself.

pub mod context;
pub mod duties;
pub mod errors;
pub mod events;
pub mod machine;
pub mod notice;
pub mod operation;
pub mod plan;
pub mod request;
pub mod signals;
pub mod state;
pub mod state_machine;

mod transitions;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;
