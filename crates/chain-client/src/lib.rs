//! Interfaces to the chains the orchestrator talks to.
//!
//! The orchestrator never signs or queries chains directly. Instead, it consumes the traits in
//! this crate, which are implemented by wallet integrations in production and by an in-memory
//! chain in tests.

pub mod errors;
pub mod rejection;
pub mod traits;

pub use errors::{ClientError, ClientResult};
pub use traits::{BankQuery, ChainClient, HubQuery, SigningClient, StakingQuery};
