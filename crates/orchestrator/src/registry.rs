//! The operation registry: stores every operation known to this process and drives its state
//! transitions.

use std::collections::{BTreeMap, VecDeque};

use lsd_operation_sm::{
    events::OperationEvent,
    machine::{OSMOutput, OperationSM},
    operation::Operation,
    state::OperationState,
    state_machine::StateMachine,
};
use lsd_primitives::types::OpId;
use tokio::{
    sync::watch,
    task::AbortHandle,
    time::{Duration, Instant},
};
use tracing::debug;

use crate::errors::{ProcessError, ProcessResult};

/// Counts the user requests an operation has accepted.
///
/// Every accepted request starts a new generation. Duty outcomes are tagged with the generation
/// of the driver that executed the duty, so outcomes of a superseded driver can be told apart
/// from current ones.
pub type Generation = u64;

#[derive(Debug)]
struct Entry {
    sm: OperationSM,
    generation: Generation,
    snapshot: watch::Sender<Operation>,
    driver: Option<AbortHandle>,
    settled_at: Option<Instant>,
}

impl Entry {
    fn new(sm: OperationSM) -> Self {
        let (snapshot, _) = watch::channel(sm.snapshot());
        let settled_at = is_settled(sm.state()).then(Instant::now);
        Self {
            sm,
            generation: 0,
            snapshot,
            driver: None,
            settled_at,
        }
    }

    fn apply(&mut self, event: OperationEvent) -> ProcessResult<OSMOutput> {
        let op_id = self.sm.op_id();
        let output = self
            .sm
            .process_event(event)
            .map_err(|err| ProcessError::from_osm(op_id, err))?;
        self.snapshot.send_replace(self.sm.snapshot());
        self.settled_at = is_settled(self.sm.state()).then(Instant::now);
        Ok(output)
    }

    /// Done for good: succeeded, or cancelled before anything reached the chain.
    fn is_finished(&self) -> bool {
        match self.sm.state() {
            OperationState::Cancelled => self.sm.notice().is_none(),
            state => state.is_final(),
        }
    }
}

/// Whether the operation waits on a user request rather than on an executor.
fn is_settled(state: &OperationState) -> bool {
    !state.is_in_flight() && *state != OperationState::Idle
}

/// The registry that holds all operations started or resumed by this process.
///
/// Finished operations are retired as soon as their last snapshot is published; only that
/// snapshot is kept, for the most recent `retired_capacity` of them. Other settled operations
/// stay until [`OperationRegistry::evict_settled`] removes them, after which they can be rebuilt
/// from the notice ledger.
#[derive(Debug)]
pub struct OperationRegistry {
    operations: BTreeMap<OpId, Entry>,
    retired: VecDeque<Operation>,
    retired_capacity: usize,
}

impl OperationRegistry {
    /// Creates a new empty registry that remembers the final snapshot of up to
    /// `retired_capacity` removed operations.
    pub const fn new(retired_capacity: usize) -> Self {
        Self {
            operations: BTreeMap::new(),
            retired: VecDeque::new(),
            retired_capacity,
        }
    }

    /// The ids of all registered operations.
    pub fn ids(&self) -> Vec<OpId> {
        self.operations.keys().copied().collect()
    }

    /// Checks if an operation is registered.
    pub fn contains(&self, op_id: &OpId) -> bool {
        self.operations.contains_key(op_id)
    }

    /// Registers `sm` unless an operation with the same id already exists.
    ///
    /// Returns whether it was inserted.
    pub fn insert(&mut self, sm: OperationSM) -> bool {
        let op_id = sm.op_id();
        if self.operations.contains_key(&op_id) {
            return false;
        }

        self.retired.retain(|op| op.op_id != op_id);
        self.operations.insert(op_id, Entry::new(sm));
        true
    }

    /// The latest snapshot of an operation, registered or recently retired.
    pub fn snapshot(&self, op_id: &OpId) -> Option<Operation> {
        match self.operations.get(op_id) {
            Some(entry) => Some(entry.snapshot.borrow().clone()),
            None => self.retired(op_id).cloned(),
        }
    }

    /// Subscribes to the snapshots of an operation.
    ///
    /// A retired operation yields a receiver that holds its final snapshot and never changes.
    pub fn subscribe(&self, op_id: &OpId) -> Option<watch::Receiver<Operation>> {
        match self.operations.get(op_id) {
            Some(entry) => Some(entry.snapshot.subscribe()),
            None => self
                .retired(op_id)
                .map(|op| watch::channel(op.clone()).1),
        }
    }

    /// Processes a user request.
    ///
    /// On success a new generation starts and is returned along with the output.
    pub fn process_request(
        &mut self,
        op_id: &OpId,
        event: OperationEvent,
    ) -> ProcessResult<(Generation, OSMOutput)> {
        let entry = self
            .operations
            .get_mut(op_id)
            .ok_or(ProcessError::NotFound(*op_id))?;

        let output = entry.apply(event)?;
        entry.generation += 1;
        let generation = entry.generation;

        if let Some(driver) = self.retire_if_finished(op_id).and_then(|entry| entry.driver) {
            driver.abort();
        }
        Ok((generation, output))
    }

    /// Processes the outcome of a duty executed by the driver of `generation`.
    pub fn process_outcome(
        &mut self,
        op_id: &OpId,
        generation: Generation,
        event: OperationEvent,
    ) -> ProcessResult<OSMOutput> {
        let entry = self
            .operations
            .get_mut(op_id)
            .ok_or(ProcessError::NotFound(*op_id))?;

        if entry.generation != generation {
            return Err(ProcessError::Stale(*op_id));
        }

        let output = entry.apply(event)?;
        self.retire_if_finished(op_id);
        Ok(output)
    }

    /// Records the task driving `generation` of an operation.
    ///
    /// The driver of an older generation is aborted, since its outcomes would be dropped anyway.
    /// A handle for a generation that is already superseded is aborted right away.
    pub fn track_driver(&mut self, op_id: &OpId, generation: Generation, driver: AbortHandle) {
        let Some(entry) = self.operations.get_mut(op_id) else {
            return;
        };

        if entry.generation != generation {
            driver.abort();
            return;
        }

        if let Some(previous) = entry.driver.replace(driver) {
            previous.abort();
        }
    }

    /// Removes operations that have been settled for at least `older_than`.
    ///
    /// Returns the ids of the removed operations.
    pub fn evict_settled(&mut self, older_than: Duration) -> Vec<OpId> {
        let now = Instant::now();
        let expired: Vec<OpId> = self
            .operations
            .iter()
            .filter(|(_, entry)| {
                entry
                    .settled_at
                    .is_some_and(|at| now.saturating_duration_since(at) >= older_than)
            })
            .map(|(op_id, _)| *op_id)
            .collect();

        for op_id in &expired {
            self.retire(op_id);
        }
        expired
    }

    fn retired(&self, op_id: &OpId) -> Option<&Operation> {
        self.retired.iter().rev().find(|op| op.op_id == *op_id)
    }

    fn retire_if_finished(&mut self, op_id: &OpId) -> Option<Entry> {
        if self
            .operations
            .get(op_id)
            .is_some_and(|entry| entry.is_finished())
        {
            return self.retire(op_id);
        }
        None
    }

    fn retire(&mut self, op_id: &OpId) -> Option<Entry> {
        let entry = self.operations.remove(op_id)?;
        debug!(%op_id, state = %entry.sm.state(), "retiring operation");

        if self.retired_capacity > 0 {
            if self.retired.len() >= self.retired_capacity {
                self.retired.pop_front();
            }
            self.retired.push_back(entry.snapshot.borrow().clone());
        }
        Some(entry)
    }
}
