//! Submission of planned transactions to the signing client.

use lsd_chain_client::{
    rejection::{classify, SubmitFailure},
    ChainClient, ClientResult,
};
use lsd_operation_sm::{
    events::OperationEvent,
    plan::{ConfirmationProbe, PlannedTx},
};
use lsd_params::Params;
use lsd_primitives::types::{Amount, OpId};
use tracing::{info, warn};

/// Reads the value the confirmation probe will later be compared against.
///
/// Must be read before the transaction is submitted, otherwise a fast chain could already reflect
/// its effect.
pub async fn read_baseline<C>(client: &C, probe: &ConfirmationProbe) -> ClientResult<Amount>
where
    C: ChainClient + ?Sized,
{
    match probe {
        ConfirmationProbe::Balance {
            chain,
            address,
            denom,
            ..
        } => client.balance(chain, address, denom).await,
        ConfirmationProbe::ShareRecords { owner, .. } => Ok(client
            .tokenize_share_records(owner)
            .await?
            .iter()
            .map(|record| Amount::from(record.id))
            .max()
            .unwrap_or_default()),
        ConfirmationProbe::UnstakeCleared { .. } => Ok(0),
    }
}

/// Signs and broadcasts `tx`, reporting whether it reached the chain.
pub async fn execute_submit<C>(
    cfg: &Params,
    client: &C,
    op_id: OpId,
    tx: &PlannedTx,
) -> OperationEvent
where
    C: ChainClient + ?Sized,
{
    let step = tx.step;
    info!(%op_id, %step, chain = %tx.chain, msgs = tx.msgs.len(), "executing submit duty");

    let baseline = match read_baseline(client, &tx.probe).await {
        Ok(baseline) => baseline,
        Err(err) => {
            warn!(%op_id, %step, %err, "could not read confirmation baseline");
            return OperationEvent::BroadcastFailed {
                step,
                code: None,
                detail: format!("could not read confirmation baseline: {err}"),
            };
        }
    };

    match client.submit(&tx.chain, &tx.sender, &tx.msgs).await {
        Ok(response) if response.is_success() => {
            info!(%op_id, %step, tx_hash = %response.hash, %baseline, "transaction broadcast");
            OperationEvent::Broadcast {
                step,
                tx_hash: response.hash,
                baseline,
            }
        }
        Ok(response) => {
            warn!(%op_id, %step, code = response.code, raw_log = %response.raw_log, "chain refused transaction");
            OperationEvent::BroadcastFailed {
                step,
                code: Some(i64::from(response.code)),
                detail: response.raw_log,
            }
        }
        Err(err) => match classify(&err, &cfg.signing) {
            SubmitFailure::UserRejected => {
                info!(%op_id, %step, "user rejected transaction");
                OperationEvent::UserRejected { step }
            }
            SubmitFailure::Broadcast { code, detail } => {
                warn!(%op_id, %step, ?code, %detail, "transaction not broadcast");
                OperationEvent::BroadcastFailed { step, code, detail }
            }
        },
    }
}
