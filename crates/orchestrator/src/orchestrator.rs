//! The API through which operations are started and controlled.

use std::sync::Arc;

use lsd_chain_client::ChainClient;
use lsd_ledger::NoticeDb;
use lsd_operation_sm::{
    events::OperationEvent,
    machine::OperationSM,
    notice::Notice,
    operation::{Operation, OperationStatus},
    request::OperationRequest,
};
use lsd_params::Params;
use lsd_primitives::types::OpId;
use parking_lot::Mutex;
use tokio::{sync::watch, time::Duration};
use tracing::{info, warn};

use crate::{
    driver::{drive, supervise},
    errors::{OrchestratorError, OrchestratorResult, ProcessError},
    persister::persist_signals,
    registry::OperationRegistry,
};

/// State shared between the API and the drivers.
#[derive(Debug)]
pub(crate) struct Shared<C, Db> {
    pub(crate) cfg: Params,
    pub(crate) client: C,
    pub(crate) db: Db,
    pub(crate) registry: Mutex<OperationRegistry>,
}

/// Starts, tracks and controls liquid-staking operations.
///
/// Every operation is driven by its own task, so several operations can be in flight at once.
/// They share nothing but the chain client and the notice ledger. Must be used from within a
/// tokio runtime.
#[derive(Debug)]
pub struct Orchestrator<C, Db> {
    shared: Arc<Shared<C, Db>>,
}

impl<C, Db> Clone for Orchestrator<C, Db> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<C, Db> Orchestrator<C, Db>
where
    C: ChainClient + 'static,
    Db: NoticeDb,
{
    /// Creates an orchestrator with no registered operations.
    ///
    /// The final snapshots of up to `notice_capacity` finished operations stay queryable.
    pub fn new(cfg: Params, client: C, db: Db) -> Self {
        let registry = OperationRegistry::new(cfg.notice_capacity);
        Self {
            shared: Arc::new(Shared {
                cfg,
                client,
                db,
                registry: Mutex::new(registry),
            }),
        }
    }

    /// The notice ledger this orchestrator writes to.
    pub fn db(&self) -> &Db {
        &self.shared.db
    }

    /// Registers a new operation for `request` and starts driving it.
    pub async fn start_operation(&self, request: OperationRequest) -> OrchestratorResult<OpId> {
        let op_id = OpId::random();
        let kind = request.kind();
        self.shared
            .registry
            .lock()
            .insert(OperationSM::new(op_id, request));
        info!(%op_id, %kind, "starting operation");

        self.request(op_id, OperationEvent::Start).await?;
        Ok(op_id)
    }

    /// The ids of the operations currently held in memory.
    pub fn active_operations(&self) -> Vec<OpId> {
        self.shared.registry.lock().ids()
    }

    /// The latest snapshot of a registered or recently finished operation.
    pub fn get_operation_status(&self, op_id: OpId) -> OrchestratorResult<Operation> {
        self.shared
            .registry
            .lock()
            .snapshot(&op_id)
            .ok_or(OrchestratorError::NotFound(op_id))
    }

    /// Subscribes to every new snapshot of a registered operation.
    pub fn subscribe(&self, op_id: OpId) -> OrchestratorResult<watch::Receiver<Operation>> {
        self.shared
            .registry
            .lock()
            .subscribe(&op_id)
            .ok_or(OrchestratorError::NotFound(op_id))
    }

    /// Waits until the operation stops making progress on its own and returns its snapshot.
    pub async fn wait(&self, op_id: OpId) -> OrchestratorResult<Operation> {
        let mut rx = self.subscribe(op_id)?;
        let settled = rx
            .wait_for(|op| op.status != OperationStatus::Loading)
            .await
            .map_err(|_| OrchestratorError::NotFound(op_id))?
            .clone();
        Ok(settled)
    }

    /// Retries a failed or cancelled operation, keeping its id.
    ///
    /// Operations that are no longer registered, for instance after a restart, are rebuilt from
    /// their notice first.
    pub async fn retry_operation(&self, op_id: OpId) -> OrchestratorResult<()> {
        self.ensure_registered(op_id).await?;
        self.request(op_id, OperationEvent::Retry).await
    }

    /// Polls again for the effect of a transaction whose confirmation timed out.
    ///
    /// Nothing is resubmitted. Like [`Self::retry_operation`], this rebuilds operations that are
    /// no longer registered from their notice, including ones whose confirmation was still
    /// running when the process stopped.
    pub async fn recheck_operation(&self, op_id: OpId) -> OrchestratorResult<()> {
        self.ensure_registered(op_id).await?;
        self.request(op_id, OperationEvent::Recheck).await
    }

    /// Drops operations that have waited on the user for at least `older_than`.
    ///
    /// Evicted operations can still be retried or rechecked through their notice. Returns how
    /// many were dropped.
    pub fn evict_settled(&self, older_than: Duration) -> usize {
        let evicted = self.shared.registry.lock().evict_settled(older_than);
        if !evicted.is_empty() {
            info!(count = evicted.len(), "evicted settled operations");
        }
        evicted.len()
    }

    /// Cancels an operation.
    ///
    /// Returns `false` without changing anything once a transaction has been handed to the
    /// signing client.
    pub async fn cancel_operation(&self, op_id: OpId) -> OrchestratorResult<bool> {
        {
            let registry = self.shared.registry.lock();
            if !registry.contains(&op_id) && registry.snapshot(&op_id).is_some() {
                info!(%op_id, "cancellation refused, operation already finished");
                return Ok(false);
            }
        }

        match self.request(op_id, OperationEvent::Cancel).await {
            Ok(()) => Ok(true),
            Err(OrchestratorError::Process(ProcessError::EventRejected(_, _, reason))) => {
                info!(%op_id, %reason, "cancellation refused");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// The persisted notices, newest first.
    pub async fn list_notices(&self) -> OrchestratorResult<Vec<Notice>> {
        Ok(self.shared.db.list().await?)
    }

    async fn ensure_registered(&self, op_id: OpId) -> OrchestratorResult<()> {
        if self.shared.registry.lock().contains(&op_id) {
            return Ok(());
        }

        let notice = self
            .shared
            .db
            .get(op_id)
            .await?
            .ok_or(OrchestratorError::NotFound(op_id))?;
        let sm = OperationSM::restore(&notice).ok_or(OrchestratorError::NotResumable(op_id))?;
        if self.shared.registry.lock().insert(sm) {
            info!(%op_id, status = %notice.status, "restored operation from notice ledger");
        }
        Ok(())
    }

    async fn request(&self, op_id: OpId, event: OperationEvent) -> OrchestratorResult<()> {
        let processed = self
            .shared
            .registry
            .lock()
            .process_request(&op_id, event.clone());
        let (generation, output) = processed.inspect_err(|err| {
            warn!(%op_id, %event, %err, "request refused");
        })?;

        persist_signals(&self.shared.db, output.signals).await;

        if !output.duties.is_empty() {
            let driver = tokio::spawn(drive(
                self.shared.clone(),
                op_id,
                generation,
                output.duties,
            ));
            self.shared
                .registry
                .lock()
                .track_driver(&op_id, generation, driver.abort_handle());
            tokio::spawn(supervise(op_id, generation, driver));
        }

        Ok(())
    }
}
