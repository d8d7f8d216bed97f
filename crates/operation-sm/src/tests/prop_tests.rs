//! Property tests over arbitrary event sequences.
#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{
        duties::OperationDuty,
        events::OperationEvent,
        machine::OperationSM,
        plan::Step,
        state::Failure,
        state_machine::StateMachine,
        testing::fixtures::*,
    };

    fn arb_step() -> impl Strategy<Value = Step> {
        prop_oneof![Just(Step::Prepare), Just(Step::Send)]
    }

    fn arb_event() -> impl Strategy<Value = OperationEvent> {
        prop_oneof![
            Just(OperationEvent::Start),
            Just(OperationEvent::Planned(Box::new(prepare_tx()))),
            Just(OperationEvent::Planned(Box::new(send_tx(None)))),
            Just(OperationEvent::PlanningFailed {
                failure: Failure::Precondition {
                    reason: "no eligible validator".to_owned(),
                },
            }),
            arb_step().prop_map(|step| OperationEvent::UserRejected { step }),
            arb_step().prop_map(|step| OperationEvent::BroadcastFailed {
                step,
                code: Some(5),
                detail: "failed".to_owned(),
            }),
            (arb_step(), 1u8..3).prop_map(|(step, n)| OperationEvent::Broadcast {
                step,
                tx_hash: test_tx_hash(n),
                baseline: 0,
            }),
            (arb_step(), 1u8..3).prop_map(|(step, n)| OperationEvent::Confirmed {
                step,
                tx_hash: test_tx_hash(n),
            }),
            (arb_step(), 1u8..3).prop_map(|(step, n)| OperationEvent::ConfirmationTimedOut {
                step,
                tx_hash: test_tx_hash(n),
            }),
            Just(OperationEvent::Cancel),
            Just(OperationEvent::Retry),
            Just(OperationEvent::Recheck),
        ]
    }

    proptest! {
        #[test]
        fn errors_leave_the_machine_untouched(events in prop::collection::vec(arb_event(), 0..40)) {
            let mut sm = OperationSM::new(TEST_OP_ID, redelegate_request());
            for event in events {
                let before = sm.clone();
                if sm.process_event(event).is_err() {
                    prop_assert_eq!(&sm, &before);
                }
            }
        }

        #[test]
        fn preparation_is_never_resubmitted_after_broadcast(
            events in prop::collection::vec(arb_event(), 0..40)
        ) {
            let mut sm = OperationSM::new(TEST_OP_ID, redelegate_request());
            let mut prepare_broadcast = false;

            for event in events {
                let Ok(output) = sm.process_event(event) else { continue };
                for duty in &output.duties {
                    if let OperationDuty::Submit { tx, .. } = duty {
                        if tx.step == Step::Prepare {
                            prop_assert!(!prepare_broadcast, "preparation resubmitted after broadcast");
                        }
                    }
                }
                prepare_broadcast = sm.context().tx_hashes().prepare.is_some()
                    && sm.context().resume().next_step() == Some(Step::Send);
            }
        }

        #[test]
        fn no_notice_before_anything_reaches_the_chain(
            events in prop::collection::vec(arb_event(), 0..40)
        ) {
            let mut sm = OperationSM::new(TEST_OP_ID, redelegate_request());
            let mut reached_chain = false;

            for event in events {
                let on_chain = matches!(
                    event,
                    OperationEvent::Broadcast { .. } | OperationEvent::BroadcastFailed { .. }
                );
                let Ok(output) = sm.process_event(event) else { continue };
                reached_chain |= on_chain;

                if !reached_chain {
                    prop_assert!(output.signals.is_empty());
                    prop_assert!(sm.notice().is_none());
                }
            }
        }
    }
}
