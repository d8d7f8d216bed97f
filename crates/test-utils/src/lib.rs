//! This crate provides test utilities shared by the crates that talk to chains.
//!
//! The centerpiece is [`MockChain`](chain::MockChain), an in-memory stand-in for the source chain,
//! the hub and any bridge target that implements every client trait and applies a simplified
//! version of each message's effect, so that executors and the orchestrator can be exercised end
//! to end without a node.

pub mod chain;
pub mod fixtures;
pub mod prelude;
