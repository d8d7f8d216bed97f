//! Errors of the notice ledger.

use thiserror::Error;

use crate::persistent::errors::StorageError;

/// Errors that can occur when reading or writing notices.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The persistent store failed.
    #[error("sqlite: {0}")]
    Storage(#[from] StorageError),

    /// A ledger must be able to hold at least one notice.
    #[error("notice capacity must be greater than zero")]
    ZeroCapacity,
}

/// The result type of ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
