//! User-initiated transitions: start, cancel, retry and recheck.

use crate::{
    duties::OperationDuty,
    errors::{OSMError, OSMResult},
    events::OperationEvent,
    machine::{OSMOutput, OperationSM},
    plan::{ResumePoint, Step},
    state::OperationState,
};

impl OperationSM {
    pub(crate) fn process_start(&mut self) -> OSMResult<OSMOutput> {
        match &self.state {
            OperationState::Idle => {
                self.state = OperationState::Preparing;
                Ok(self.output(vec![self.plan_duty()]))
            }
            state if state.is_in_flight() => {
                Err(OSMError::duplicate(state.clone(), OperationEvent::Start))
            }
            state => Err(OSMError::invalid_event(
                state.clone(),
                OperationEvent::Start,
                Some("operation was already started; use retry".to_owned()),
            )),
        }
    }

    /// Cancellation is only honored while nothing irreversible has happened.
    pub(crate) fn process_cancel(&mut self) -> OSMResult<OSMOutput> {
        match &self.state {
            OperationState::Idle => {}
            OperationState::Preparing if self.context.resume == ResumePoint::Start => {}
            OperationState::Cancelled => {
                return Err(OSMError::duplicate(
                    self.state.clone(),
                    OperationEvent::Cancel,
                ));
            }
            state => {
                return Err(OSMError::rejected(
                    state.clone(),
                    OperationEvent::Cancel,
                    "operation is past the point of no return",
                ));
            }
        }

        self.state = OperationState::Cancelled;
        Ok(self.output(vec![]))
    }

    pub(crate) fn process_retry(&mut self) -> OSMResult<OSMOutput> {
        match &self.state {
            OperationState::Failed { .. }
            | OperationState::Cancelled
            | OperationState::Unconfirmed {
                step: Step::Prepare,
                ..
            } => {}
            OperationState::Unconfirmed {
                step: Step::Send, ..
            } => {
                return Err(OSMError::rejected(
                    self.state.clone(),
                    OperationEvent::Retry,
                    "the final transaction may still land; recheck it instead",
                ));
            }
            state if state.is_in_flight() => {
                return Err(OSMError::rejected(
                    state.clone(),
                    OperationEvent::Retry,
                    "operation is still in progress",
                ));
            }
            state => {
                return Err(OSMError::invalid_event(
                    state.clone(),
                    OperationEvent::Retry,
                    None,
                ));
            }
        }

        self.state = OperationState::Preparing;
        Ok(self.output(vec![self.plan_duty()]))
    }

    /// Polls an unconfirmed transaction again without resubmitting it.
    pub(crate) fn process_recheck(&mut self) -> OSMResult<OSMOutput> {
        let OperationState::Unconfirmed {
            step,
            tx_hash,
            baseline,
            probe,
        } = &self.state
        else {
            return Err(match &self.state {
                state @ OperationState::AwaitingConfirmation { .. } => {
                    OSMError::duplicate(state.clone(), OperationEvent::Recheck)
                }
                state => OSMError::invalid_event(state.clone(), OperationEvent::Recheck, None),
            });
        };

        let duty = OperationDuty::AwaitConfirmation {
            op_id: self.context.op_id,
            step: *step,
            tx_hash: tx_hash.clone(),
            baseline: *baseline,
            probe: probe.clone(),
        };

        self.state = OperationState::AwaitingConfirmation {
            step: *step,
            tx_hash: tx_hash.clone(),
            baseline: *baseline,
            probe: probe.clone(),
        };

        Ok(self.output(vec![duty]))
    }
}
