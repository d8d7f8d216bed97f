//! The interface shared by every notice ledger implementation.

use async_trait::async_trait;
use lsd_operation_sm::notice::Notice;
use lsd_primitives::types::OpId;

use crate::errors::LedgerResult;

/// Storage for operation notices.
#[async_trait]
pub trait NoticeDb: Send + Sync + 'static {
    /// Inserts `notice` or replaces the notice with the same id.
    ///
    /// The written notice becomes the newest one. Its timestamp is the one of the first insertion
    /// of that id, or the current time if the id is new. Returns the notice as stored.
    async fn upsert(&self, notice: Notice) -> LedgerResult<Notice>;

    /// Returns the notice with the given id, if it is still in the ledger.
    async fn get(&self, id: OpId) -> LedgerResult<Option<Notice>>;

    /// Returns all notices, newest first.
    async fn list(&self) -> LedgerResult<Vec<Notice>>;

    /// Removes the notice with the given id. Returns whether it existed.
    async fn remove(&self, id: OpId) -> LedgerResult<bool>;
}
