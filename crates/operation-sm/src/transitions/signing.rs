use lsd_primitives::types::{Amount, RecordId, TxHash};

use crate::{
    duties::OperationDuty,
    errors::{OSMError, OSMResult},
    events::OperationEvent,
    machine::{OSMOutput, OperationSM},
    plan::{PlannedTx, ResumePoint, Step},
    state::{Failure, OperationState},
};

impl OperationSM {
    /// Returns the transaction awaiting signature, provided it is the one for `step`.
    fn awaiting_signature(
        &self,
        step: Step,
        event: impl FnOnce() -> OperationEvent,
    ) -> OSMResult<&PlannedTx> {
        match &self.state {
            OperationState::AwaitingSignature { tx } if tx.step == step => Ok(tx),
            OperationState::AwaitingSignature { tx } => Err(OSMError::invalid_event(
                self.state.clone(),
                event(),
                Some(format!("awaiting signature for step {}", tx.step)),
            )),
            state => Err(OSMError::invalid_event(state.clone(), event(), None)),
        }
    }

    /// A user rejection is a cancellation, not a failure.
    ///
    /// Only once an earlier transaction of the operation reached the chain does the rejection
    /// show up in the notice ledger.
    pub(crate) fn process_user_rejected(&mut self, step: Step) -> OSMResult<OSMOutput> {
        self.awaiting_signature(step, || OperationEvent::UserRejected { step })?;

        self.state = OperationState::Cancelled;

        Ok(self.output(vec![]))
    }

    pub(crate) fn process_broadcast_failed(
        &mut self,
        step: Step,
        code: Option<i64>,
        detail: String,
    ) -> OSMResult<OSMOutput> {
        self.awaiting_signature(step, || OperationEvent::BroadcastFailed {
            step,
            code,
            detail: detail.clone(),
        })?;

        self.context.notice_opened = true;
        self.state = OperationState::Failed {
            failure: Failure::Broadcast { step, code, detail },
        };

        Ok(self.output(vec![]))
    }

    pub(crate) fn process_broadcast(
        &mut self,
        step: Step,
        tx_hash: TxHash,
        baseline: Amount,
    ) -> OSMResult<OSMOutput> {
        if let OperationState::AwaitingConfirmation {
            step: pending,
            tx_hash: pending_hash,
            ..
        } = &self.state
        {
            if *pending == step && *pending_hash == tx_hash {
                return Err(OSMError::duplicate(
                    self.state.clone(),
                    OperationEvent::Broadcast {
                        step,
                        tx_hash,
                        baseline,
                    },
                ));
            }
        }

        let tx = self.awaiting_signature(step, || OperationEvent::Broadcast {
            step,
            tx_hash: tx_hash.clone(),
            baseline,
        })?;
        let probe = tx.probe.clone();
        let followup = tx.followup.clone().unwrap_or_default();

        let ctx = &mut self.context;
        ctx.tx_hashes.set(step, tx_hash.clone());
        ctx.notice_opened = true;
        if step == Step::Prepare {
            ctx.resume = ResumePoint::Send {
                prepare_tx: tx_hash.clone(),
                followup,
                records_after: RecordId::try_from(baseline).unwrap_or(RecordId::MAX),
                records: None,
            };
        }

        let duty = OperationDuty::AwaitConfirmation {
            op_id: ctx.op_id,
            step,
            tx_hash: tx_hash.clone(),
            baseline,
            probe: probe.clone(),
        };
        self.state = OperationState::AwaitingConfirmation {
            step,
            tx_hash,
            baseline,
            probe,
        };

        Ok(self.output(vec![duty]))
    }
}
