//! Unit tests for the confirmation transitions.
#[cfg(test)]
mod tests {
    use lsd_poller::Direction;

    use crate::{
        duties::OperationDuty,
        errors::OSMError,
        events::OperationEvent,
        plan::{ResumePoint, Step},
        state::{Failure, OperationState},
        testing::fixtures::*,
        tests::*,
    };

    fn awaiting_prepare_confirm() -> OperationState {
        OperationState::AwaitingConfirmation {
            step: Step::Prepare,
            tx_hash: test_tx_hash(1),
            baseline: 3,
            probe: prepare_tx().probe,
        }
    }

    fn awaiting_send_confirm() -> OperationState {
        OperationState::AwaitingConfirmation {
            step: Step::Send,
            tx_hash: test_tx_hash(2),
            baseline: 500,
            probe: hub_balance_probe(Direction::Increase),
        }
    }

    fn sent_ctx() -> crate::context::OperationContext {
        let mut ctx = prepared_ctx();
        ctx.tx_hashes.send = Some(test_tx_hash(2));
        ctx
    }

    #[test]
    fn test_prepare_confirmed_plans_final_step() {
        test_operation_transition(
            prepared_ctx(),
            OperationTransition {
                from_state: awaiting_prepare_confirm(),
                event: OperationEvent::Confirmed {
                    step: Step::Prepare,
                    tx_hash: test_tx_hash(1),
                },
                expected_state: OperationState::Preparing,
                expected_duties: vec![plan_duty(
                    redelegate_request(),
                    prepared_ctx().resume,
                )],
                expected_signals: vec![notice_signal(prepared_ctx(), OperationState::Preparing)],
            },
        );
    }

    #[test]
    fn test_send_confirmed_succeeds() {
        let expected_state = OperationState::Succeeded {
            tx_hash: test_tx_hash(2),
        };

        test_operation_transition(
            sent_ctx(),
            OperationTransition {
                from_state: awaiting_send_confirm(),
                event: OperationEvent::Confirmed {
                    step: Step::Send,
                    tx_hash: test_tx_hash(2),
                },
                expected_state: expected_state.clone(),
                expected_duties: vec![],
                expected_signals: vec![notice_signal(sent_ctx(), expected_state)],
            },
        );
    }

    #[test]
    fn test_confirmation_of_other_tx_is_invalid() {
        test_operation_invalid_transition(
            sent_ctx(),
            OperationInvalidTransition {
                from_state: awaiting_send_confirm(),
                event: OperationEvent::Confirmed {
                    step: Step::Send,
                    tx_hash: test_tx_hash(3),
                },
                expected_error: |e| matches!(e, OSMError::InvalidEvent { .. }),
            },
        );
    }

    #[test]
    fn test_repeated_confirmation_is_duplicate() {
        test_operation_invalid_transition(
            sent_ctx(),
            OperationInvalidTransition {
                from_state: OperationState::Succeeded {
                    tx_hash: test_tx_hash(2),
                },
                event: OperationEvent::Confirmed {
                    step: Step::Send,
                    tx_hash: test_tx_hash(2),
                },
                expected_error: |e| matches!(e, OSMError::Duplicate { .. }),
            },
        );
    }

    #[test]
    fn test_timeout_is_unconfirmed_not_error() {
        let expected_state = OperationState::Unconfirmed {
            step: Step::Send,
            tx_hash: test_tx_hash(2),
            baseline: 500,
            probe: hub_balance_probe(Direction::Increase),
        };

        test_operation_transition(
            sent_ctx(),
            OperationTransition {
                from_state: awaiting_send_confirm(),
                event: OperationEvent::ConfirmationTimedOut {
                    step: Step::Send,
                    tx_hash: test_tx_hash(2),
                },
                expected_state: expected_state.clone(),
                expected_duties: vec![],
                expected_signals: vec![notice_signal(sent_ctx(), expected_state)],
            },
        );
    }

    #[test]
    fn test_reverted_preparation_restarts_from_scratch() {
        let failure = Failure::Confirmation {
            step: Step::Prepare,
            reason: "reverted".to_owned(),
        };
        let expected_state = OperationState::Failed {
            failure: failure.clone(),
        };
        let mut expected_ctx = prepared_ctx();
        expected_ctx.resume = ResumePoint::Start;

        test_operation_transition(
            prepared_ctx(),
            OperationTransition {
                from_state: awaiting_prepare_confirm(),
                event: OperationEvent::ConfirmationFailed {
                    step: Step::Prepare,
                    tx_hash: test_tx_hash(1),
                    reason: "reverted".to_owned(),
                },
                expected_state: expected_state.clone(),
                expected_duties: vec![],
                expected_signals: vec![notice_signal(expected_ctx, expected_state)],
            },
        );
    }

    #[test]
    fn test_recheck_polls_same_tx_again() {
        let unconfirmed = OperationState::Unconfirmed {
            step: Step::Send,
            tx_hash: test_tx_hash(2),
            baseline: 500,
            probe: hub_balance_probe(Direction::Increase),
        };

        test_operation_transition(
            sent_ctx(),
            OperationTransition {
                from_state: unconfirmed,
                event: OperationEvent::Recheck,
                expected_state: awaiting_send_confirm(),
                expected_duties: vec![OperationDuty::AwaitConfirmation {
                    op_id: TEST_OP_ID,
                    step: Step::Send,
                    tx_hash: test_tx_hash(2),
                    baseline: 500,
                    probe: hub_balance_probe(Direction::Increase),
                }],
                expected_signals: vec![notice_signal(sent_ctx(), awaiting_send_confirm())],
            },
        );
    }

    #[test]
    fn test_recheck_requires_unconfirmed() {
        test_operation_invalid_transition(
            sent_ctx(),
            OperationInvalidTransition {
                from_state: OperationState::Failed {
                    failure: Failure::Interrupted,
                },
                event: OperationEvent::Recheck,
                expected_error: |e| matches!(e, OSMError::InvalidEvent { .. }),
            },
        );
    }
}
