use lsd_primitives::types::{Amount, TxHash};

use crate::{
    errors::{OSMError, OSMResult},
    events::OperationEvent,
    machine::{OSMOutput, OperationSM},
    plan::{ConfirmationProbe, ResumePoint, Step},
    state::{Failure, OperationState},
};

impl OperationSM {
    /// Ensures `tx_hash` of `step` is the transaction being polled and returns its baseline and
    /// probe.
    fn awaiting_confirmation(
        &self,
        step: Step,
        tx_hash: &TxHash,
        event: impl FnOnce() -> OperationEvent,
    ) -> OSMResult<(Amount, ConfirmationProbe)> {
        match &self.state {
            OperationState::AwaitingConfirmation {
                step: pending,
                tx_hash: pending_hash,
                baseline,
                probe,
            } if *pending == step && pending_hash == tx_hash => Ok((*baseline, probe.clone())),
            OperationState::AwaitingConfirmation { tx_hash: pending_hash, .. } => {
                Err(OSMError::invalid_event(
                    self.state.clone(),
                    event(),
                    Some(format!("awaiting confirmation of {pending_hash}")),
                ))
            }
            state => Err(OSMError::invalid_event(state.clone(), event(), None)),
        }
    }

    pub(crate) fn process_confirmed(&mut self, step: Step, tx_hash: TxHash) -> OSMResult<OSMOutput> {
        if matches!(&self.state, OperationState::Succeeded { tx_hash: done } if *done == tx_hash) {
            return Err(OSMError::duplicate(
                self.state.clone(),
                OperationEvent::Confirmed { step, tx_hash },
            ));
        }

        self.awaiting_confirmation(step, &tx_hash, || OperationEvent::Confirmed {
            step,
            tx_hash: tx_hash.clone(),
        })?;

        match step {
            // the final step can only be planned from state observable after this point
            Step::Prepare => {
                self.state = OperationState::Preparing;
                Ok(self.output(vec![self.plan_duty()]))
            }
            Step::Send => {
                self.state = OperationState::Succeeded { tx_hash };
                Ok(self.output(vec![]))
            }
        }
    }

    pub(crate) fn process_confirmation_failed(
        &mut self,
        step: Step,
        tx_hash: TxHash,
        reason: String,
    ) -> OSMResult<OSMOutput> {
        self.awaiting_confirmation(step, &tx_hash, || OperationEvent::ConfirmationFailed {
            step,
            tx_hash: tx_hash.clone(),
            reason: reason.clone(),
        })?;

        // a reverted preparation leaves nothing for the final step to send
        if step == Step::Prepare {
            self.context.resume = ResumePoint::Start;
        }
        self.state = OperationState::Failed {
            failure: Failure::Confirmation { step, reason },
        };

        Ok(self.output(vec![]))
    }

    pub(crate) fn process_confirmation_timed_out(
        &mut self,
        step: Step,
        tx_hash: TxHash,
    ) -> OSMResult<OSMOutput> {
        let (baseline, probe) = self.awaiting_confirmation(step, &tx_hash, || {
            OperationEvent::ConfirmationTimedOut {
                step,
                tx_hash: tx_hash.clone(),
            }
        })?;

        self.state = OperationState::Unconfirmed {
            step,
            tx_hash,
            baseline,
            probe,
        };

        Ok(self.output(vec![]))
    }
}
