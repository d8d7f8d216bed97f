use crate::{
    duties::OperationDuty,
    errors::{OSMError, OSMResult},
    events::OperationEvent,
    machine::{OSMOutput, OperationSM},
    plan::{PlannedTx, ResumePoint, Step},
    state::{Failure, OperationState},
};

impl OperationSM {
    pub(crate) fn process_planned(&mut self, tx: PlannedTx) -> OSMResult<OSMOutput> {
        let invalid = |state: &OperationState, tx: PlannedTx, reason: &str| {
            OSMError::invalid_event(
                state.clone(),
                OperationEvent::Planned(Box::new(tx)),
                Some(reason.to_owned()),
            )
        };

        if self.state != OperationState::Preparing {
            return Err(OSMError::invalid_event(
                self.state.clone(),
                OperationEvent::Planned(Box::new(tx)),
                None,
            ));
        }

        if tx.msgs.is_empty() {
            return Err(invalid(&self.state, tx, "planned transaction has no messages"));
        }

        if tx.step == Step::Prepare {
            if !self.context.request.kind().is_two_step() {
                return Err(invalid(
                    &self.state,
                    tx,
                    "only two-step operations have a preparation step",
                ));
            }
            if matches!(self.context.resume, ResumePoint::Send { .. }) {
                return Err(invalid(
                    &self.state,
                    tx,
                    "preparation transaction was already broadcast",
                ));
            }
            if tx.followup.is_none() {
                return Err(invalid(
                    &self.state,
                    tx,
                    "preparation transaction carries no follow-up",
                ));
            }
        }

        let ctx = &mut self.context;
        if tx.step == Step::Prepare {
            ctx.two_step = true;
        }
        if tx.quote.is_some() {
            ctx.quote = tx.quote;
        }
        if let (ResumePoint::Send { records, .. }, Some(pinned)) = (&mut ctx.resume, &tx.records) {
            *records = Some(pinned.clone());
        }
        ctx.pending_msgs = tx.msgs.clone();

        let tx = Box::new(tx);
        let duty = OperationDuty::Submit {
            op_id: ctx.op_id,
            tx: tx.clone(),
        };
        self.state = OperationState::AwaitingSignature { tx };

        Ok(self.output(vec![duty]))
    }

    pub(crate) fn process_planning_failed(&mut self, failure: Failure) -> OSMResult<OSMOutput> {
        if self.state != OperationState::Preparing {
            return Err(OSMError::invalid_event(
                self.state.clone(),
                OperationEvent::PlanningFailed { failure },
                None,
            ));
        }

        self.state = OperationState::Failed { failure };

        Ok(self.output(vec![]))
    }
}
