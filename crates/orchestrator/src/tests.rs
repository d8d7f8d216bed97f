use lsd_chain_client::ClientError;
use lsd_ledger::{NoticeDb, NoticeLedgerInMemory};
use lsd_operation_sm::{
    notice::NoticeStatus,
    operation::OperationStatus,
    plan::Step,
    request::{Accounts, OperationArgs, OperationRequest},
};
use lsd_primitives::{msgs::ChainMsg, staking::LsmShare};
use lsd_test_utils::prelude::*;
use tokio::time::Duration;

use super::*;

type TestOrchestrator = Orchestrator<MockChain, NoticeLedgerInMemory>;

fn ledger() -> NoticeLedgerInMemory {
    NoticeLedgerInMemory::new(test_params().notice_capacity).unwrap()
}

fn orchestrator(chain: &MockChain, db: &NoticeLedgerInMemory) -> TestOrchestrator {
    Orchestrator::new(test_params(), chain.clone(), db.clone())
}

fn request(args: OperationArgs) -> OperationRequest {
    request_for(USER_HUB, args)
}

fn request_for(hub: &str, args: OperationArgs) -> OperationRequest {
    OperationRequest::new(
        Accounts {
            source: Some(USER_SOURCE.to_owned()),
            hub: Some(hub.to_owned()),
        },
        args,
    )
}

fn rejection() -> SubmitOutcome {
    SubmitOutcome::Fail(ClientError::provider(Some(4001), "Request rejected"))
}

fn tokenize_submissions(chain: &MockChain) -> usize {
    chain
        .submissions()
        .iter()
        .filter(|submission| {
            submission
                .msgs
                .iter()
                .any(|msg| matches!(msg, ChainMsg::TokenizeShares { .. }))
        })
        .count()
}

#[tokio::test(start_paused = true)]
async fn stake_runs_to_completion() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);

    let op_id = orchestrator
        .start_operation(request(OperationArgs::Stake { amount: 1_000 }))
        .await
        .unwrap();
    let op = orchestrator.wait(op_id).await.unwrap();

    assert_eq!(op.status, OperationStatus::Success);
    assert_eq!(op.will_receive, Some(800));
    assert!(op.tx_hashes.send.is_some());
    assert_eq!(
        chain.balance_of(&hub_chain(), USER_HUB, &lsd_denom()),
        USER_LSD_BALANCE + 800
    );

    let notices = orchestrator.list_notices().await.unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].id, op_id);
    assert_eq!(notices[0].status, NoticeStatus::Confirmed);
}

#[tokio::test(start_paused = true)]
async fn redelegation_runs_both_steps() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);

    let op_id = orchestrator
        .start_operation(request(OperationArgs::RedelegateStaked { amount: 100 }))
        .await
        .unwrap();
    let op = orchestrator.wait(op_id).await.unwrap();

    assert_eq!(op.status, OperationStatus::Success);
    assert_eq!(op.steps, vec![Step::Prepare, Step::Send]);
    assert!(op.tx_hashes.prepare.is_some());
    assert!(op.tx_hashes.send.is_some());
    assert_eq!(chain.submissions().len(), 2);
    assert!(chain.balance_of(&hub_chain(), USER_HUB, &lsd_denom()) > USER_LSD_BALANCE);
    assert_eq!(
        chain.delegation_of(USER_SOURCE, VALIDATOR_A),
        USER_DELEGATION - 100
    );
}

#[tokio::test(start_paused = true)]
async fn retry_after_failed_send_does_not_prepare_again() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);
    chain.script_submit(SubmitOutcome::Accept);
    chain.script_submit(SubmitOutcome::ChainError {
        code: 11,
        raw_log: "out of gas".to_owned(),
    });

    let op_id = orchestrator
        .start_operation(request(OperationArgs::RedelegateStaked { amount: 100 }))
        .await
        .unwrap();
    let failed = orchestrator.wait(op_id).await.unwrap();
    assert_eq!(failed.status, OperationStatus::Error);
    assert_eq!(failed.step, Some(Step::Send));
    let prepare_tx = failed.tx_hashes.prepare.clone();
    assert!(prepare_tx.is_some());

    orchestrator.retry_operation(op_id).await.unwrap();
    let op = orchestrator.wait(op_id).await.unwrap();

    assert_eq!(op.status, OperationStatus::Success);
    assert_eq!(op.op_id, op_id);
    assert_eq!(op.tx_hashes.prepare, prepare_tx);
    assert_eq!(chain.submissions().len(), 3);
    assert_eq!(tokenize_submissions(&chain), 1);

    let notices = orchestrator.list_notices().await.unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].status, NoticeStatus::Confirmed);
}

#[tokio::test(start_paused = true)]
async fn rejection_of_first_step_leaves_no_notice() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);
    chain.script_submit(rejection());

    let op_id = orchestrator
        .start_operation(request(OperationArgs::RedelegateStaked { amount: 100 }))
        .await
        .unwrap();
    let op = orchestrator.wait(op_id).await.unwrap();

    assert_eq!(op.status, OperationStatus::Cancelled);
    assert!(orchestrator.list_notices().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn rejection_of_second_step_leaves_one_cancelled_notice() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);
    chain.script_submit(SubmitOutcome::Accept);
    chain.script_submit(rejection());

    let op_id = orchestrator
        .start_operation(request(OperationArgs::RedelegateStaked { amount: 100 }))
        .await
        .unwrap();
    let op = orchestrator.wait(op_id).await.unwrap();

    assert_eq!(op.status, OperationStatus::Cancelled);
    let notices = orchestrator.list_notices().await.unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].status, NoticeStatus::Cancelled);
    assert!(notices[0].tx_hash.is_some());
}

#[tokio::test(start_paused = true)]
async fn precondition_failure_is_reported_without_submitting() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);

    let op_id = orchestrator
        .start_operation(request(OperationArgs::Stake {
            amount: USER_NATIVE_BALANCE + 1,
        }))
        .await
        .unwrap();
    let op = orchestrator.wait(op_id).await.unwrap();

    assert_eq!(op.status, OperationStatus::Error);
    assert!(op.message.is_some());
    assert!(chain.submissions().is_empty());
    assert!(orchestrator.list_notices().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancellation_is_refused_after_broadcast() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);

    let op_id = orchestrator
        .start_operation(request(OperationArgs::Stake { amount: 1_000 }))
        .await
        .unwrap();
    orchestrator.wait(op_id).await.unwrap();

    assert!(!orchestrator.cancel_operation(op_id).await.unwrap());
    assert_eq!(
        orchestrator.get_operation_status(op_id).unwrap().status,
        OperationStatus::Success
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_before_planning_completes() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);

    let op_id = orchestrator
        .start_operation(request(OperationArgs::Stake { amount: 1_000 }))
        .await
        .unwrap();

    assert!(orchestrator.cancel_operation(op_id).await.unwrap());
    let op = orchestrator.wait(op_id).await.unwrap();
    assert_eq!(op.status, OperationStatus::Cancelled);

    tokio::time::sleep(test_params().poll.interval).await;
    assert!(chain.submissions().is_empty());
    assert_eq!(
        orchestrator.get_operation_status(op_id).unwrap().status,
        OperationStatus::Cancelled
    );
}

#[tokio::test(start_paused = true)]
async fn unconfirmed_operation_is_rechecked_not_resubmitted() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);
    chain.set_effects(Effects::Withhold);

    let op_id = orchestrator
        .start_operation(request(OperationArgs::Stake { amount: 1_000 }))
        .await
        .unwrap();
    let op = orchestrator.wait(op_id).await.unwrap();
    assert_eq!(op.status, OperationStatus::SubmittedUnconfirmed);
    assert_eq!(
        orchestrator.list_notices().await.unwrap()[0].status,
        NoticeStatus::Unconfirmed
    );

    assert!(matches!(
        orchestrator.retry_operation(op_id).await,
        Err(OrchestratorError::Process(ProcessError::EventRejected(..)))
    ));

    chain.release_withheld();
    orchestrator.recheck_operation(op_id).await.unwrap();
    let op = orchestrator.wait(op_id).await.unwrap();

    assert_eq!(op.status, OperationStatus::Success);
    assert_eq!(chain.submissions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_operation_resumes_after_restart() {
    let chain = seeded_chain();
    let db = ledger();
    chain.script_submit(SubmitOutcome::Accept);
    chain.script_submit(SubmitOutcome::ChainError {
        code: 11,
        raw_log: "out of gas".to_owned(),
    });

    let op_id = {
        let before = orchestrator(&chain, &db);
        let op_id = before
            .start_operation(request(OperationArgs::RedelegateStaked { amount: 100 }))
            .await
            .unwrap();
        assert_eq!(
            before.wait(op_id).await.unwrap().status,
            OperationStatus::Error
        );
        op_id
    };

    let after = orchestrator(&chain, &db);
    assert!(matches!(
        after.get_operation_status(op_id),
        Err(OrchestratorError::NotFound(_))
    ));

    after.retry_operation(op_id).await.unwrap();
    let op = after.wait(op_id).await.unwrap();

    assert_eq!(op.status, OperationStatus::Success);
    assert_eq!(tokenize_submissions(&chain), 1);
    let notices = after.list_notices().await.unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].status, NoticeStatus::Confirmed);
}

#[tokio::test(start_paused = true)]
async fn pending_confirmation_is_rechecked_after_restart() {
    let chain = seeded_chain();
    let db = ledger();
    chain.set_effects(Effects::Withhold);

    let op_id = {
        let before = orchestrator(&chain, &db);
        let op_id = before
            .start_operation(request(OperationArgs::Stake { amount: 1_000 }))
            .await
            .unwrap();
        assert_eq!(
            before.wait(op_id).await.unwrap().status,
            OperationStatus::SubmittedUnconfirmed
        );
        op_id
    };

    let after = orchestrator(&chain, &db);
    chain.release_withheld();
    after.recheck_operation(op_id).await.unwrap();
    let op = after.wait(op_id).await.unwrap();

    assert_eq!(op.status, OperationStatus::Success);
    assert_eq!(chain.submissions().len(), 1);
    assert_eq!(db.get(op_id).await.unwrap().unwrap().status, NoticeStatus::Confirmed);
}

#[tokio::test(start_paused = true)]
async fn share_redelegation_runs_both_steps() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);
    let record_id = chain.add_share_record(USER_SOURCE, VALIDATOR_A, 100);

    let op_id = orchestrator
        .start_operation(request(OperationArgs::RedelegateLsm {
            shares: vec![LsmShare {
                validator: VALIDATOR_A.to_owned(),
                record_id,
                amount: 100,
            }],
        }))
        .await
        .unwrap();
    let op = orchestrator.wait(op_id).await.unwrap();

    assert_eq!(op.status, OperationStatus::Success);
    assert_eq!(op.steps, vec![Step::Prepare, Step::Send]);
    assert_eq!(chain.submissions().len(), 2);
    assert_eq!(tokenize_submissions(&chain), 1);
}

#[tokio::test(start_paused = true)]
async fn finished_operations_leave_the_registry() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);

    let staked = orchestrator
        .start_operation(request(OperationArgs::Stake { amount: 1_000 }))
        .await
        .unwrap();
    orchestrator.wait(staked).await.unwrap();

    let cancelled = orchestrator
        .start_operation(request(OperationArgs::Stake { amount: 1_000 }))
        .await
        .unwrap();
    assert!(orchestrator.cancel_operation(cancelled).await.unwrap());

    assert!(orchestrator.active_operations().is_empty());
    assert_eq!(
        orchestrator.get_operation_status(staked).unwrap().status,
        OperationStatus::Success
    );
    assert_eq!(
        orchestrator.get_operation_status(cancelled).unwrap().status,
        OperationStatus::Cancelled
    );
}

#[tokio::test(start_paused = true)]
async fn evicted_operations_are_restored_on_retry() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);
    chain.script_submit(SubmitOutcome::ChainError {
        code: 11,
        raw_log: "out of gas".to_owned(),
    });

    let op_id = orchestrator
        .start_operation(request(OperationArgs::Stake { amount: 1_000 }))
        .await
        .unwrap();
    assert_eq!(
        orchestrator.wait(op_id).await.unwrap().status,
        OperationStatus::Error
    );

    assert_eq!(orchestrator.evict_settled(Duration::from_secs(60)), 0);
    tokio::time::advance(Duration::from_secs(60)).await;
    assert_eq!(orchestrator.evict_settled(Duration::from_secs(60)), 1);
    assert!(orchestrator.active_operations().is_empty());

    orchestrator.retry_operation(op_id).await.unwrap();
    let op = orchestrator.wait(op_id).await.unwrap();
    assert_eq!(op.status, OperationStatus::Success);
}

#[tokio::test]
async fn unknown_operation_is_not_found() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);
    let op_id = lsd_primitives::types::OpId::random();

    assert!(matches!(
        orchestrator.retry_operation(op_id).await,
        Err(OrchestratorError::NotFound(id)) if id == op_id
    ));
    assert!(matches!(
        orchestrator.cancel_operation(op_id).await,
        Err(OrchestratorError::Process(ProcessError::NotFound(_)))
    ));
}

#[tokio::test(start_paused = true)]
async fn concurrent_operations_are_independent() {
    let chain = seeded_chain();
    let db = ledger();
    let orchestrator = orchestrator(&chain, &db);

    // the two operations observe different balances
    let stake = orchestrator
        .start_operation(request_for(
            "neutron1other",
            OperationArgs::Stake { amount: 1_000 },
        ))
        .await
        .unwrap();
    let unstake = orchestrator
        .start_operation(request(OperationArgs::Unstake { amount: 100 }))
        .await
        .unwrap();

    assert_eq!(
        orchestrator.wait(stake).await.unwrap().status,
        OperationStatus::Success
    );
    assert_eq!(
        orchestrator.wait(unstake).await.unwrap().status,
        OperationStatus::Success
    );
    assert_eq!(orchestrator.list_notices().await.unwrap().len(), 2);
}
