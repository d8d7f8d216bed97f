use std::path::Path;

use anyhow::{Context, Result};
use lsd_ledger::{NoticeDb, SqliteLedger};
use lsd_operation_sm::notice::Notice;
use tracing::info;

/// Lists the notices of the ledger at `db`, newest first.
pub(crate) async fn handle_notices(db: &Path, capacity: usize) -> Result<Vec<Notice>> {
    let ledger = SqliteLedger::open(db, capacity)
        .await
        .with_context(|| format!("failed to open notice ledger {}", db.display()))?;
    let notices = ledger.list().await.context("failed to list notices")?;
    info!(count = notices.len(), "read notices");
    Ok(notices)
}

#[cfg(test)]
mod tests {
    use lsd_operation_sm::notice::NoticeStatus;
    use lsd_primitives::types::{OpId, OperationKind};

    use super::*;

    fn notice(n: u8) -> Notice {
        Notice {
            id: OpId::from_bytes([n; 16]),
            kind: OperationKind::Stake,
            status: NoticeStatus::Confirmed,
            amount: 1_000,
            will_receive: Some(800),
            tx_hash: None,
            message: None,
            progress: None,
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn lists_persisted_notices_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notices.db");
        {
            let ledger = SqliteLedger::open(&path, 10).await.unwrap();
            ledger.upsert(notice(1)).await.unwrap();
            ledger.upsert(notice(2)).await.unwrap();
        }

        let notices = handle_notices(&path, 10).await.unwrap();

        let ids: Vec<OpId> = notices.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![OpId::from_bytes([2; 16]), OpId::from_bytes([1; 16])]);
    }
}
