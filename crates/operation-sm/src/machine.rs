//! The Operation State Machine (OSM).
//!
//! Responsible for driving one operation by reacting to events and producing the required duties
//! and notice updates.

use lsd_primitives::types::OpId;

use crate::{
    context::OperationContext,
    duties::OperationDuty,
    errors::OSMError,
    events::OperationEvent,
    notice::{Notice, NoticeProgress, NoticeStatus, PendingConfirmation},
    operation::{Operation, OperationStatus},
    plan::{ResumePoint, Step},
    request::OperationRequest,
    signals::OperationSignal,
    state::{Failure, OperationState},
    state_machine::{SMOutput, StateMachine},
};

/// The State Machine that tracks one user-initiated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSM {
    /// Context associated with this operation.
    pub(crate) context: OperationContext,
    /// The current state.
    pub(crate) state: OperationState,
}

/// The output of the Operation State Machine after processing an event.
pub type OSMOutput = SMOutput<OperationDuty, OperationSignal>;

impl StateMachine for OperationSM {
    type Duty = OperationDuty;
    type OutgoingSignal = OperationSignal;
    type Event = OperationEvent;
    type Error = OSMError;

    fn process_event(&mut self, event: Self::Event) -> Result<OSMOutput, Self::Error> {
        match event {
            OperationEvent::Start => self.process_start(),
            OperationEvent::Planned(tx) => self.process_planned(*tx),
            OperationEvent::PlanningFailed { failure } => self.process_planning_failed(failure),
            OperationEvent::UserRejected { step } => self.process_user_rejected(step),
            OperationEvent::BroadcastFailed { step, code, detail } => {
                self.process_broadcast_failed(step, code, detail)
            }
            OperationEvent::Broadcast {
                step,
                tx_hash,
                baseline,
            } => self.process_broadcast(step, tx_hash, baseline),
            OperationEvent::Confirmed { step, tx_hash } => self.process_confirmed(step, tx_hash),
            OperationEvent::ConfirmationFailed {
                step,
                tx_hash,
                reason,
            } => self.process_confirmation_failed(step, tx_hash, reason),
            OperationEvent::ConfirmationTimedOut { step, tx_hash } => {
                self.process_confirmation_timed_out(step, tx_hash)
            }
            OperationEvent::Cancel => self.process_cancel(),
            OperationEvent::Retry => self.process_retry(),
            OperationEvent::Recheck => self.process_recheck(),
        }
    }
}

impl OperationSM {
    /// Creates a new operation in [`OperationState::Idle`].
    pub const fn new(op_id: OpId, request: OperationRequest) -> Self {
        Self {
            context: OperationContext::new(op_id, request),
            state: OperationState::Idle,
        }
    }

    /// Rebuilds an operation from its persisted notice.
    ///
    /// A transaction that was still being confirmed comes back as
    /// [`OperationState::Unconfirmed`], ready to be rechecked. Returns `None` when there is
    /// nothing left to resume: the operation completed, the notice carries no progress, or its
    /// final transaction may be pending on chain and cannot be polled for.
    pub fn restore(notice: &Notice) -> Option<Self> {
        let progress = notice.progress.as_ref()?;

        let state = match (notice.status, &progress.failure, &progress.confirmation) {
            (NoticeStatus::Confirmed, ..) => return None,
            (NoticeStatus::Cancelled, ..) => OperationState::Cancelled,
            (NoticeStatus::Error, Some(failure), _) => OperationState::Failed {
                failure: failure.clone(),
            },
            (NoticeStatus::Pending | NoticeStatus::Unconfirmed, _, Some(pending)) => {
                OperationState::Unconfirmed {
                    step: pending.step,
                    tx_hash: pending.tx_hash.clone(),
                    baseline: pending.baseline,
                    probe: pending.probe.clone(),
                }
            }
            _ if progress.tx_hashes.send.is_some() => return None,
            _ => OperationState::Failed {
                failure: Failure::Interrupted,
            },
        };

        let context = OperationContext {
            op_id: notice.id,
            request: progress.request.clone(),
            resume: progress.resume.clone(),
            tx_hashes: progress.tx_hashes.clone(),
            pending_msgs: progress.pending_msgs.clone(),
            quote: progress.quote,
            two_step: progress.steps.contains(&Step::Prepare)
                || matches!(progress.resume, ResumePoint::Send { .. }),
            notice_opened: true,
        };

        Some(Self { context, state })
    }

    /// Returns a reference to the context of the operation.
    pub const fn context(&self) -> &OperationContext {
        &self.context
    }

    /// Returns a reference to the current state.
    pub const fn state(&self) -> &OperationState {
        &self.state
    }

    /// Returns a mutable reference to the current state.
    pub const fn state_mut(&mut self) -> &mut OperationState {
        &mut self.state
    }

    /// The operation id.
    pub const fn op_id(&self) -> OpId {
        self.context.op_id
    }

    /// Builds an immutable snapshot of the operation.
    pub fn snapshot(&self) -> Operation {
        let ctx = &self.context;
        Operation {
            op_id: ctx.op_id,
            kind: ctx.request.kind(),
            amount: ctx.amount(),
            will_receive: ctx.will_receive(),
            step: self.state.step().or_else(|| ctx.resume.next_step()),
            steps: ctx.steps(),
            status: self.status(),
            phase: self.state.to_string(),
            message: self.message(),
            tx_hashes: ctx.tx_hashes.clone(),
            pending_msgs: ctx.pending_msgs.clone(),
            resume: ctx.resume.clone(),
        }
    }

    /// The operation's notice, once a transaction has reached the chain.
    pub fn notice(&self) -> Option<Notice> {
        let ctx = &self.context;
        if !ctx.notice_opened {
            return None;
        }

        let status = match &self.state {
            OperationState::Succeeded { .. } => NoticeStatus::Confirmed,
            OperationState::Failed { .. } => NoticeStatus::Error,
            OperationState::Cancelled => NoticeStatus::Cancelled,
            OperationState::Unconfirmed { .. } => NoticeStatus::Unconfirmed,
            _ => NoticeStatus::Pending,
        };

        let failure = match &self.state {
            OperationState::Failed { failure } => Some(failure.clone()),
            _ => None,
        };

        let confirmation = match &self.state {
            OperationState::AwaitingConfirmation {
                step,
                tx_hash,
                baseline,
                probe,
            }
            | OperationState::Unconfirmed {
                step,
                tx_hash,
                baseline,
                probe,
            } => Some(PendingConfirmation {
                step: *step,
                tx_hash: tx_hash.clone(),
                baseline: *baseline,
                probe: probe.clone(),
            }),
            _ => None,
        };

        Some(Notice {
            id: ctx.op_id,
            kind: ctx.request.kind(),
            status,
            amount: ctx.amount(),
            will_receive: ctx.will_receive(),
            tx_hash: ctx.tx_hashes.latest().cloned(),
            message: self.message(),
            progress: Some(NoticeProgress {
                request: ctx.request.clone(),
                resume: ctx.resume.clone(),
                steps: ctx.steps(),
                tx_hashes: ctx.tx_hashes.clone(),
                pending_msgs: ctx.pending_msgs.clone(),
                failure,
                quote: ctx.quote,
                confirmation,
            }),
            timestamp: None,
        })
    }

    fn status(&self) -> OperationStatus {
        match &self.state {
            OperationState::Idle => OperationStatus::Idle,
            OperationState::Preparing
            | OperationState::AwaitingSignature { .. }
            | OperationState::AwaitingConfirmation { .. } => OperationStatus::Loading,
            OperationState::Succeeded { .. } => OperationStatus::Success,
            OperationState::Failed { .. } => OperationStatus::Error,
            OperationState::Unconfirmed { .. } => OperationStatus::SubmittedUnconfirmed,
            OperationState::Cancelled => OperationStatus::Cancelled,
        }
    }

    fn message(&self) -> Option<String> {
        match &self.state {
            OperationState::AwaitingSignature { tx } if self.context.two_step => Some(format!(
                "sign transaction {} of 2 ({})",
                tx.step.ordinal(),
                tx.step
            )),
            OperationState::AwaitingSignature { .. } => Some("sign the transaction".to_owned()),
            OperationState::Unconfirmed { tx_hash, .. } => Some(format!(
                "transaction {tx_hash} was submitted but its effect has not been observed yet"
            )),
            OperationState::Failed { failure } => Some(failure.to_string()),
            _ => None,
        }
    }

    /// Wraps `duties` into an output, attaching the current notice if one is open.
    pub(crate) fn output(&self, duties: Vec<OperationDuty>) -> OSMOutput {
        let signals = self
            .notice()
            .map(|notice| OperationSignal::Notice(Box::new(notice)))
            .into_iter()
            .collect();

        SMOutput::with_duties_and_signals(duties, signals)
    }

    pub(crate) fn plan_duty(&self) -> OperationDuty {
        OperationDuty::Plan {
            op_id: self.context.op_id,
            request: self.context.request.clone(),
            resume: self.context.resume.clone(),
        }
    }
}
