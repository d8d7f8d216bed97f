//! SQLite-backed notice ledger.

pub mod errors;
pub mod sqlite;
