//! Tests for the Operation State Machine.

mod confirmation;
mod control;
mod prop_tests;
mod signing;

use crate::{
    context::OperationContext,
    duties::OperationDuty,
    errors::OSMError,
    events::OperationEvent,
    machine::OperationSM,
    plan::ResumePoint,
    request::OperationRequest,
    signals::OperationSignal,
    state::OperationState,
    testing::{
        fixtures::*,
        transition::{test_invalid_transition, test_transition, InvalidTransition, Transition},
    },
};

/// Type alias for Operation State Machine transitions.
pub(super) type OperationTransition =
    Transition<OperationState, OperationEvent, OperationDuty, OperationSignal>;

/// Type alias for invalid Operation State Machine transitions.
pub(super) type OperationInvalidTransition =
    InvalidTransition<OperationState, OperationEvent, OSMError>;

/// A context for a fresh, single-step stake.
pub(super) fn stake_ctx() -> OperationContext {
    OperationContext::new(TEST_OP_ID, stake_request())
}

/// A context for a redelegation that has not broadcast anything yet.
pub(super) fn redelegate_ctx() -> OperationContext {
    OperationContext::new(TEST_OP_ID, redelegate_request())
}

/// A context for a redelegation whose preparation transaction was broadcast.
pub(super) fn prepared_ctx() -> OperationContext {
    let mut ctx = redelegate_ctx();
    ctx.two_step = true;
    ctx.notice_opened = true;
    ctx.quote = prepare_tx().quote;
    ctx.pending_msgs = prepare_tx().msgs;
    ctx.tx_hashes.prepare = Some(test_tx_hash(1));
    ctx.resume = ResumePoint::Send {
        prepare_tx: test_tx_hash(1),
        followup: prepare_tx().followup.unwrap_or_default(),
        records_after: 3,
        records: None,
    };
    ctx
}

pub(super) fn sm_with(context: OperationContext, state: OperationState) -> OperationSM {
    OperationSM { context, state }
}

pub(super) fn get_state(sm: &OperationSM) -> &OperationState {
    sm.state()
}

/// The notice signal the state machine emits once it is in `state` with `context`.
pub(super) fn notice_signal(context: OperationContext, state: OperationState) -> OperationSignal {
    let notice = sm_with(context, state)
        .notice()
        .expect("notice must be open");
    OperationSignal::Notice(Box::new(notice))
}

pub(super) fn plan_duty(request: OperationRequest, resume: ResumePoint) -> OperationDuty {
    OperationDuty::Plan {
        op_id: TEST_OP_ID,
        request,
        resume,
    }
}

/// Tests a transition of a state machine built from `context`.
pub(super) fn test_operation_transition(context: OperationContext, transition: OperationTransition) {
    test_transition(|state| sm_with(context.clone(), state), get_state, transition);
}

/// Tests that a transition of a state machine built from `context` fails.
pub(super) fn test_operation_invalid_transition(
    context: OperationContext,
    invalid: OperationInvalidTransition,
) {
    test_invalid_transition(|state| sm_with(context.clone(), state), get_state, invalid);
}
