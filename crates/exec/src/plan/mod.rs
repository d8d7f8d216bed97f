//! Executors that turn an operation request into the next transaction to sign.
//!
//! Every kind of operation has its own planner. All of them start from fresh chain state and
//! check the preconditions of the operation before building any message.

mod bridge;
mod hub;
mod redelegate;
mod stake;

use chrono::Utc;
use lsd_chain_client::{BankQuery, ChainClient};
use lsd_operation_sm::{
    events::OperationEvent,
    plan::{PlannedTx, ResumePoint},
    request::{OperationArgs, OperationRequest},
};
use lsd_params::Params;
use lsd_planner::PlanError;
use lsd_primitives::types::{Address, Amount, ChainId, OpId};
use tracing::{info, warn};

use crate::errors::{ExecError, ExecResult};

/// Plans the next transaction of an operation and reports it back as an event.
pub async fn execute_plan<C>(
    cfg: &Params,
    client: &C,
    op_id: OpId,
    request: &OperationRequest,
    resume: &ResumePoint,
) -> OperationEvent
where
    C: ChainClient + ?Sized,
{
    info!(%op_id, kind = %request.kind(), ?resume, "executing plan duty");

    match plan_operation(cfg, client, request, resume).await {
        Ok(tx) => {
            info!(%op_id, step = %tx.step, msgs = tx.msgs.len(), "planned transaction");
            OperationEvent::Planned(Box::new(tx))
        }
        Err(err) => {
            warn!(%op_id, %err, "could not plan operation");
            OperationEvent::PlanningFailed {
                failure: err.into_failure(),
            }
        }
    }
}

/// Plans the next transaction of an operation.
pub async fn plan_operation<C>(
    cfg: &Params,
    client: &C,
    request: &OperationRequest,
    resume: &ResumePoint,
) -> ExecResult<PlannedTx>
where
    C: ChainClient + ?Sized,
{
    let accounts = &request.accounts;

    if let ResumePoint::Send {
        followup,
        records_after,
        records,
        ..
    } = resume
    {
        return redelegate::plan_send(
            cfg,
            client,
            accounts,
            followup,
            *records_after,
            records.as_deref(),
        )
        .await;
    }

    if request.requested_amount() == 0 && !matches!(request.args, OperationArgs::Withdraw) {
        return Err(PlanError::ZeroAmount.into());
    }

    match &request.args {
        OperationArgs::Stake { amount } => stake::plan_stake(cfg, client, accounts, *amount).await,
        OperationArgs::Unstake { amount } => {
            hub::plan_unstake(cfg, client, accounts, *amount).await
        }
        OperationArgs::Withdraw => hub::plan_withdraw(cfg, client, accounts).await,
        OperationArgs::Bridge { amount, route } => {
            bridge::plan_bridge(cfg, client, accounts, *amount, route).await
        }
        OperationArgs::RedelegateStaked { amount } => {
            redelegate::plan_from_staked(cfg, client, accounts, *amount).await
        }
        OperationArgs::RedelegateLsm { shares } => {
            redelegate::plan_from_lsm(cfg, client, accounts, shares).await
        }
    }
}

fn connected<'a>(account: &'a Option<Address>, chain: &'static str) -> ExecResult<&'a str> {
    account
        .as_deref()
        .ok_or(ExecError::WalletNotConnected(chain))
}

async fn ensure_balance<C>(
    client: &C,
    chain: &ChainId,
    address: &str,
    denom: &str,
    required: Amount,
) -> ExecResult<()>
where
    C: BankQuery + ?Sized,
{
    let available = client.balance(chain, address, denom).await?;
    if available < required {
        return Err(ExecError::InsufficientBalance {
            denom: denom.to_owned(),
            required,
            available,
        });
    }
    Ok(())
}

/// Absolute IBC timeout, `ibc_timeout` from now, in nanoseconds since the unix epoch.
fn ibc_timeout_timestamp(cfg: &Params) -> ExecResult<u64> {
    let timeout =
        chrono::Duration::from_std(cfg.ibc_timeout).map_err(|_| ExecError::TimeoutOutOfRange)?;
    let deadline = Utc::now()
        .checked_add_signed(timeout)
        .ok_or(ExecError::TimeoutOutOfRange)?;
    deadline
        .timestamp_nanos_opt()
        .and_then(|nanos| u64::try_from(nanos).ok())
        .ok_or(ExecError::TimeoutOutOfRange)
}
