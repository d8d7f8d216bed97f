//! Unit tests for process_cancel and process_retry.
#[cfg(test)]
mod tests {
    use lsd_poller::Direction;

    use crate::{
        errors::OSMError,
        events::OperationEvent,
        plan::{ResumePoint, Step},
        state::{Failure, OperationState},
        testing::fixtures::*,
        tests::*,
    };

    #[test]
    fn test_cancel_before_any_broadcast() {
        for from_state in [OperationState::Idle, OperationState::Preparing] {
            test_operation_transition(
                redelegate_ctx(),
                OperationTransition {
                    from_state,
                    event: OperationEvent::Cancel,
                    expected_state: OperationState::Cancelled,
                    expected_duties: vec![],
                    expected_signals: vec![],
                },
            );
        }
    }

    #[test]
    fn test_cancel_after_point_of_no_return_is_rejected() {
        // the preparation transaction is on chain
        test_operation_invalid_transition(
            prepared_ctx(),
            OperationInvalidTransition {
                from_state: OperationState::Preparing,
                event: OperationEvent::Cancel,
                expected_error: |e| matches!(e, OSMError::Rejected { .. }),
            },
        );

        test_operation_invalid_transition(
            stake_ctx(),
            OperationInvalidTransition {
                from_state: OperationState::AwaitingSignature {
                    tx: Box::new(stake_tx()),
                },
                event: OperationEvent::Cancel,
                expected_error: |e| matches!(e, OSMError::Rejected { .. }),
            },
        );
    }

    #[test]
    fn test_cancel_twice_is_duplicate() {
        test_operation_invalid_transition(
            stake_ctx(),
            OperationInvalidTransition {
                from_state: OperationState::Cancelled,
                event: OperationEvent::Cancel,
                expected_error: |e| matches!(e, OSMError::Duplicate { .. }),
            },
        );
    }

    #[test]
    fn test_retry_of_failed_final_step_skips_preparation() {
        let failure = Failure::Broadcast {
            step: Step::Send,
            code: Some(11),
            detail: "out of gas".to_owned(),
        };

        test_operation_transition(
            prepared_ctx(),
            OperationTransition {
                from_state: OperationState::Failed { failure },
                event: OperationEvent::Retry,
                expected_state: OperationState::Preparing,
                expected_duties: vec![plan_duty(redelegate_request(), prepared_ctx().resume)],
                expected_signals: vec![notice_signal(prepared_ctx(), OperationState::Preparing)],
            },
        );
    }

    #[test]
    fn test_retry_after_cancelled_first_step_starts_over() {
        test_operation_transition(
            redelegate_ctx(),
            OperationTransition {
                from_state: OperationState::Cancelled,
                event: OperationEvent::Retry,
                expected_state: OperationState::Preparing,
                expected_duties: vec![plan_duty(redelegate_request(), ResumePoint::Start)],
                expected_signals: vec![],
            },
        );
    }

    #[test]
    fn test_retry_of_unconfirmed_preparation_resumes_at_send() {
        test_operation_transition(
            prepared_ctx(),
            OperationTransition {
                from_state: OperationState::Unconfirmed {
                    step: Step::Prepare,
                    tx_hash: test_tx_hash(1),
                    baseline: 3,
                    probe: prepare_tx().probe,
                },
                event: OperationEvent::Retry,
                expected_state: OperationState::Preparing,
                expected_duties: vec![plan_duty(redelegate_request(), prepared_ctx().resume)],
                expected_signals: vec![notice_signal(prepared_ctx(), OperationState::Preparing)],
            },
        );
    }

    #[test]
    fn test_retry_of_unconfirmed_final_step_is_rejected() {
        test_operation_invalid_transition(
            stake_ctx(),
            OperationInvalidTransition {
                from_state: OperationState::Unconfirmed {
                    step: Step::Send,
                    tx_hash: test_tx_hash(2),
                    baseline: 500,
                    probe: hub_balance_probe(Direction::Increase),
                },
                event: OperationEvent::Retry,
                expected_error: |e| matches!(e, OSMError::Rejected { .. }),
            },
        );
    }

    #[test]
    fn test_retry_in_flight_or_done_fails() {
        test_operation_invalid_transition(
            stake_ctx(),
            OperationInvalidTransition {
                from_state: OperationState::Preparing,
                event: OperationEvent::Retry,
                expected_error: |e| matches!(e, OSMError::Rejected { .. }),
            },
        );

        test_operation_invalid_transition(
            stake_ctx(),
            OperationInvalidTransition {
                from_state: OperationState::Succeeded {
                    tx_hash: test_tx_hash(2),
                },
                event: OperationEvent::Retry,
                expected_error: |e| matches!(e, OSMError::InvalidEvent { .. }),
            },
        );
    }
}
