//! Bounded polling for the side effects of submitted transactions.
//!
//! Transactions are confirmed by observing their effect on chain state (a balance moving, records
//! appearing or disappearing) rather than by inclusion. [`poll_until`] repeatedly fetches a value
//! and asks a judge whether the expected effect has happened, giving up after a fixed budget.

mod balance;
mod retry;

pub use balance::{await_balance_change, Direction};
pub use retry::{poll_until, PollOutcome, Verdict};
