//! Confirmation of broadcast transactions by polling for their effect.

use lsd_chain_client::ChainClient;
use lsd_operation_sm::{
    events::OperationEvent,
    plan::{ConfirmationProbe, Step},
};
use lsd_params::Params;
use lsd_poller::{await_balance_change, poll_until, PollOutcome, Verdict};
use lsd_primitives::{
    hub::{UnstakeRecord, UnstakeStatus},
    staking::TokenizedShareRecord,
    types::{Amount, OpId, TxHash, UnstakeIndex},
};
use tracing::{info, warn};

/// Judges the unstake records of a withdrawing user.
///
/// The withdrawal is done once none of the withdrawn records remains. A record that went back to
/// `default` means the interchain withdrawal failed and the record can be claimed again.
pub fn judge_withdrawal(indices: &[UnstakeIndex], records: &[UnstakeRecord]) -> Verdict {
    let mut remaining = records
        .iter()
        .filter(|record| indices.contains(&record.index))
        .peekable();

    if remaining.peek().is_none() {
        return Verdict::Confirmed;
    }

    match remaining.find(|record| record.status == UnstakeStatus::Default) {
        Some(record) => Verdict::Failed(format!(
            "withdrawal of unstake record {} reverted",
            record.index
        )),
        None => Verdict::Pending,
    }
}

/// Judges the share records of a preparing user.
///
/// Confirmed once at least `expected` records have an id above `baseline`, the highest id held
/// before the broadcast.
pub fn judge_new_records(
    baseline: Amount,
    expected: usize,
    records: &[TokenizedShareRecord],
) -> Verdict {
    let created = records
        .iter()
        .filter(|record| Amount::from(record.id) > baseline)
        .count();
    if created >= expected {
        Verdict::Confirmed
    } else {
        Verdict::Pending
    }
}

/// Polls until the effect described by `probe` is observed, then reports the outcome.
pub async fn execute_await_confirmation<C>(
    cfg: &Params,
    client: &C,
    op_id: OpId,
    step: Step,
    tx_hash: &TxHash,
    baseline: Amount,
    probe: &ConfirmationProbe,
) -> OperationEvent
where
    C: ChainClient + ?Sized,
{
    info!(%op_id, %step, %tx_hash, %baseline, "executing await confirmation duty");

    let outcome = match probe {
        ConfirmationProbe::Balance {
            chain,
            address,
            denom,
            direction,
        } => forget(
            await_balance_change(client, &cfg.poll, chain, address, denom, *direction, baseline)
                .await,
        ),
        ConfirmationProbe::ShareRecords { owner, expected } => forget(
            poll_until(
                &cfg.poll,
                || client.tokenize_share_records(owner),
                |records| judge_new_records(baseline, *expected, records),
            )
            .await,
        ),
        ConfirmationProbe::UnstakeCleared {
            owner,
            pool_addr,
            indices,
        } => forget(
            poll_until(
                &cfg.poll,
                || client.unstake_records(owner, pool_addr),
                |records| judge_withdrawal(indices, records),
            )
            .await,
        ),
    };

    let tx_hash = tx_hash.clone();
    match outcome {
        PollOutcome::Confirmed { attempts, .. } => {
            info!(%op_id, %step, %tx_hash, %attempts, "transaction confirmed");
            OperationEvent::Confirmed { step, tx_hash }
        }
        PollOutcome::Failed { reason, attempts } => {
            warn!(%op_id, %step, %tx_hash, %attempts, %reason, "transaction did not take effect");
            OperationEvent::ConfirmationFailed {
                step,
                tx_hash,
                reason,
            }
        }
        PollOutcome::TimedOut { attempts, .. } => {
            warn!(%op_id, %step, %tx_hash, %attempts, "transaction unconfirmed");
            OperationEvent::ConfirmationTimedOut { step, tx_hash }
        }
    }
}

fn forget<T>(outcome: PollOutcome<T>) -> PollOutcome<()> {
    match outcome {
        PollOutcome::Confirmed { attempts, .. } => PollOutcome::Confirmed {
            value: (),
            attempts,
        },
        PollOutcome::Failed { reason, attempts } => PollOutcome::Failed { reason, attempts },
        PollOutcome::TimedOut { attempts, last } => PollOutcome::TimedOut {
            attempts,
            last: last.map(|_| ()),
        },
    }
}
