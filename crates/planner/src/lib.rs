//! Pure planning logic for liquid-staking operations.
//!
//! Nothing in this crate performs I/O. Callers fetch chain state, hand it to the functions here
//! and receive either the exact messages to sign or a [`PlanError`](errors::PlanError) explaining
//! why no valid plan exists.

pub mod bridge;
pub mod delegations;
pub mod eligibility;
pub mod errors;
pub mod hub;
pub mod lsm;
pub mod quote;
pub mod transfer;
pub mod withdrawal;

pub use errors::{PlanError, PlanResult};
