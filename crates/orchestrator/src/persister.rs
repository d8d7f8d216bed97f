//! Writes the signals emitted by the state machines to the notice ledger.

use lsd_ledger::NoticeDb;
use lsd_operation_sm::signals::OperationSignal;
use tracing::{debug, error};

/// Persists every notice in `signals`.
///
/// A failed write is logged and skipped: the operation keeps running and its next transition
/// writes the notice again.
pub async fn persist_signals<Db>(db: &Db, signals: Vec<OperationSignal>)
where
    Db: NoticeDb + ?Sized,
{
    for signal in signals {
        match signal {
            OperationSignal::Notice(notice) => {
                let id = notice.id;
                let status = notice.status;
                match db.upsert(*notice).await {
                    Ok(_) => debug!(%id, %status, "persisted notice"),
                    Err(err) => error!(%id, %status, %err, "failed to persist notice"),
                }
            }
        }
    }
}
