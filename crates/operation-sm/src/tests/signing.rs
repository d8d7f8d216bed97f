//! Unit tests for process_user_rejected, process_broadcast_failed and process_broadcast.
#[cfg(test)]
mod tests {
    use lsd_poller::Direction;

    use crate::{
        duties::OperationDuty,
        errors::OSMError,
        events::OperationEvent,
        notice::NoticeStatus,
        plan::{ResumePoint, Step},
        signals::OperationSignal,
        state::{Failure, OperationState},
        testing::fixtures::*,
        tests::*,
    };

    fn awaiting_prepare_signature() -> OperationState {
        OperationState::AwaitingSignature {
            tx: Box::new(prepare_tx()),
        }
    }

    fn awaiting_send_signature() -> OperationState {
        OperationState::AwaitingSignature {
            tx: Box::new(send_tx(None)),
        }
    }

    #[test]
    fn test_first_step_rejection_cancels_without_notice() {
        test_operation_transition(
            redelegate_ctx(),
            OperationTransition {
                from_state: awaiting_prepare_signature(),
                event: OperationEvent::UserRejected {
                    step: Step::Prepare,
                },
                expected_state: OperationState::Cancelled,
                expected_duties: vec![],
                expected_signals: vec![],
            },
        );
    }

    #[test]
    fn test_second_step_rejection_marks_notice_cancelled() {
        let mut sm = sm_with(prepared_ctx(), awaiting_send_signature());

        let output = crate::state_machine::StateMachine::process_event(
            &mut sm,
            OperationEvent::UserRejected { step: Step::Send },
        )
        .expect("rejection must be accepted");

        assert_eq!(sm.state(), &OperationState::Cancelled);
        assert!(output.duties.is_empty());
        assert_eq!(output.signals.len(), 1);
        let OperationSignal::Notice(notice) = &output.signals[0];
        assert_eq!(notice.status, NoticeStatus::Cancelled);
        assert_eq!(notice.id, TEST_OP_ID);
    }

    #[test]
    fn test_rejection_for_other_step_is_invalid() {
        test_operation_invalid_transition(
            redelegate_ctx(),
            OperationInvalidTransition {
                from_state: awaiting_prepare_signature(),
                event: OperationEvent::UserRejected { step: Step::Send },
                expected_error: |e| matches!(e, OSMError::InvalidEvent { .. }),
            },
        );
    }

    #[test]
    fn test_broadcast_failure_records_error() {
        let failure = Failure::Broadcast {
            step: Step::Send,
            code: Some(5),
            detail: "insufficient funds".to_owned(),
        };
        let expected_state = OperationState::Failed {
            failure: failure.clone(),
        };
        let mut expected_ctx = stake_ctx();
        expected_ctx.notice_opened = true;

        test_operation_transition(
            stake_ctx(),
            OperationTransition {
                from_state: OperationState::AwaitingSignature {
                    tx: Box::new(stake_tx()),
                },
                event: OperationEvent::BroadcastFailed {
                    step: Step::Send,
                    code: Some(5),
                    detail: "insufficient funds".to_owned(),
                },
                expected_state: expected_state.clone(),
                expected_duties: vec![],
                expected_signals: vec![notice_signal(expected_ctx, expected_state)],
            },
        );
    }

    #[test]
    fn test_prepare_broadcast_moves_resume_point_to_send() {
        let mut expected_ctx = redelegate_ctx();
        expected_ctx.two_step = true;
        expected_ctx.notice_opened = true;
        expected_ctx.tx_hashes.prepare = Some(test_tx_hash(1));
        expected_ctx.resume = ResumePoint::Send {
            prepare_tx: test_tx_hash(1),
            followup: prepare_tx().followup.unwrap_or_default(),
            records_after: 3,
            records: None,
        };

        let mut from_ctx = redelegate_ctx();
        from_ctx.two_step = true;

        let expected_state = OperationState::AwaitingConfirmation {
            step: Step::Prepare,
            tx_hash: test_tx_hash(1),
            baseline: 3,
            probe: prepare_tx().probe,
        };

        test_operation_transition(
            from_ctx,
            OperationTransition {
                from_state: awaiting_prepare_signature(),
                event: OperationEvent::Broadcast {
                    step: Step::Prepare,
                    tx_hash: test_tx_hash(1),
                    baseline: 3,
                },
                expected_state: expected_state.clone(),
                expected_duties: vec![OperationDuty::AwaitConfirmation {
                    op_id: TEST_OP_ID,
                    step: Step::Prepare,
                    tx_hash: test_tx_hash(1),
                    baseline: 3,
                    probe: prepare_tx().probe,
                }],
                expected_signals: vec![notice_signal(expected_ctx, expected_state)],
            },
        );
    }

    #[test]
    fn test_send_broadcast_awaits_balance_increase() {
        let mut expected_ctx = stake_ctx();
        expected_ctx.notice_opened = true;
        expected_ctx.tx_hashes.send = Some(test_tx_hash(2));

        let expected_state = OperationState::AwaitingConfirmation {
            step: Step::Send,
            tx_hash: test_tx_hash(2),
            baseline: 500,
            probe: hub_balance_probe(Direction::Increase),
        };

        test_operation_transition(
            stake_ctx(),
            OperationTransition {
                from_state: OperationState::AwaitingSignature {
                    tx: Box::new(stake_tx()),
                },
                event: OperationEvent::Broadcast {
                    step: Step::Send,
                    tx_hash: test_tx_hash(2),
                    baseline: 500,
                },
                expected_state: expected_state.clone(),
                expected_duties: vec![OperationDuty::AwaitConfirmation {
                    op_id: TEST_OP_ID,
                    step: Step::Send,
                    tx_hash: test_tx_hash(2),
                    baseline: 500,
                    probe: hub_balance_probe(Direction::Increase),
                }],
                expected_signals: vec![notice_signal(expected_ctx, expected_state)],
            },
        );
    }

    #[test]
    fn test_repeated_broadcast_is_duplicate() {
        test_operation_invalid_transition(
            stake_ctx(),
            OperationInvalidTransition {
                from_state: OperationState::AwaitingConfirmation {
                    step: Step::Send,
                    tx_hash: test_tx_hash(2),
                    baseline: 500,
                    probe: hub_balance_probe(Direction::Increase),
                },
                event: OperationEvent::Broadcast {
                    step: Step::Send,
                    tx_hash: test_tx_hash(2),
                    baseline: 500,
                },
                expected_error: |e| matches!(e, OSMError::Duplicate { .. }),
            },
        );
    }
}
