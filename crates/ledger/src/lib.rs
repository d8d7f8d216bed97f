//! The notice ledger: a capped, newest-first history of operations.
//!
//! At most one notice is kept per operation id. Writing a notice again replaces it, moves it to
//! the front and keeps the timestamp of its first insertion. Once the ledger is full, the notice
//! that was written least recently is evicted.

pub mod errors;
pub mod inmemory;
pub mod persistent;
pub mod traits;

pub use errors::{LedgerError, LedgerResult};
pub use inmemory::NoticeLedgerInMemory;
pub use persistent::sqlite::SqliteLedger;
pub use traits::NoticeDb;
