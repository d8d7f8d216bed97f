//! Drives a single operation by executing the duties its state machine emits.

use std::{collections::VecDeque, sync::Arc};

use lsd_chain_client::ChainClient;
use lsd_exec::execute_duty;
use lsd_ledger::NoticeDb;
use lsd_operation_sm::duties::OperationDuty;
use lsd_primitives::types::OpId;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{
    errors::ProcessError, orchestrator::Shared, persister::persist_signals, registry::Generation,
};

/// Executes `duties` and every duty that follows from their outcomes, until the operation
/// settles.
///
/// Duties run one after the other: each step of an operation depends on the effect of the
/// previous one being observed. Nothing here ever changes an operation's state directly; every
/// outcome goes through its state machine.
pub(crate) async fn drive<C, Db>(
    shared: Arc<Shared<C, Db>>,
    op_id: OpId,
    generation: Generation,
    duties: Vec<OperationDuty>,
) where
    C: ChainClient + 'static,
    Db: NoticeDb,
{
    let mut queue = VecDeque::from(duties);

    while let Some(duty) = queue.pop_front() {
        debug!(%op_id, %generation, %duty, "dispatching duty");
        let event = execute_duty(&shared.cfg, &shared.client, &duty).await;

        let processed = shared
            .registry
            .lock()
            .process_outcome(&op_id, generation, event);
        let output = match processed {
            Ok(output) => output,
            Err(ProcessError::Stale(_)) => {
                info!(%op_id, %generation, %duty, "dropping outcome of superseded driver");
                return;
            }
            Err(err) => {
                warn!(%op_id, %generation, %duty, %err, "state machine refused duty outcome");
                return;
            }
        };

        persist_signals(&shared.db, output.signals).await;
        queue.extend(output.duties);
    }

    debug!(%op_id, %generation, "operation settled");
}

/// Waits for the driver of `generation` and reports how it ended.
///
/// A driver that panicked leaves its operation in flight; it can only be recovered through the
/// notice ledger after a restart.
pub(crate) async fn supervise(op_id: OpId, generation: Generation, driver: JoinHandle<()>) {
    match driver.await {
        Ok(()) => {}
        Err(err) if err.is_cancelled() => {
            debug!(%op_id, %generation, "driver of superseded generation aborted");
        }
        Err(err) => {
            error!(%op_id, %generation, %err, "operation driver panicked");
        }
    }
}
