//! In-memory notice ledger.

use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use lsd_operation_sm::notice::Notice;
use lsd_primitives::types::OpId;
use tokio::sync::RwLock;
use tracing::trace;

use crate::{
    errors::{LedgerError, LedgerResult},
    traits::NoticeDb,
};

/// In-memory notice ledger. Clones share the same underlying storage.
#[derive(Debug, Clone)]
pub struct NoticeLedgerInMemory {
    capacity: usize,

    /// newest at the front
    notices: Arc<RwLock<VecDeque<Notice>>>,
}

impl NoticeLedgerInMemory {
    /// Creates an empty ledger holding at most `capacity` notices.
    pub fn new(capacity: usize) -> LedgerResult<Self> {
        if capacity == 0 {
            return Err(LedgerError::ZeroCapacity);
        }

        Ok(Self {
            capacity,
            notices: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
        })
    }

    /// The maximum number of notices kept.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl NoticeDb for NoticeLedgerInMemory {
    async fn upsert(&self, mut notice: Notice) -> LedgerResult<Notice> {
        let mut notices = self.notices.write().await;

        let previous = notices
            .iter()
            .position(|existing| existing.id == notice.id)
            .and_then(|idx| notices.remove(idx));

        notice.timestamp = previous
            .and_then(|previous| previous.timestamp)
            .or(notice.timestamp)
            .or_else(|| Some(Utc::now()));

        notices.push_front(notice.clone());
        while notices.len() > self.capacity {
            if let Some(evicted) = notices.pop_back() {
                trace!(id = %evicted.id, "evicted notice");
            }
        }

        Ok(notice)
    }

    async fn get(&self, id: OpId) -> LedgerResult<Option<Notice>> {
        Ok(self
            .notices
            .read()
            .await
            .iter()
            .find(|notice| notice.id == id)
            .cloned())
    }

    async fn list(&self) -> LedgerResult<Vec<Notice>> {
        Ok(self.notices.read().await.iter().cloned().collect())
    }

    async fn remove(&self, id: OpId) -> LedgerResult<bool> {
        let mut notices = self.notices.write().await;
        let removed = notices
            .iter()
            .position(|notice| notice.id == id)
            .and_then(|idx| notices.remove(idx));

        Ok(removed.is_some())
    }
}
