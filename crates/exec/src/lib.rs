//! This crate contains the executors that perform the duties emitted by the Operation State
//! Machine.
//!
//! An executor is the only place where chain state is read or transactions are submitted. Each
//! executor function has the following properties:
//! - It is an effectful function.
//! - It never fails: whatever goes wrong is reported back as an
//!   [`OperationEvent`](lsd_operation_sm::events::OperationEvent) so the state machine decides what
//!   happens next.
//! - It re-reads chain state on every invocation rather than trusting anything cached.

pub mod confirm;
pub mod errors;
pub mod plan;
pub mod submit;

use lsd_chain_client::ChainClient;
use lsd_operation_sm::{duties::OperationDuty, events::OperationEvent};
use lsd_params::Params;

pub use errors::{ExecError, ExecResult};

/// Executes `duty` and returns the event describing its outcome.
pub async fn execute_duty<C>(cfg: &Params, client: &C, duty: &OperationDuty) -> OperationEvent
where
    C: ChainClient + ?Sized,
{
    match duty {
        OperationDuty::Plan {
            op_id,
            request,
            resume,
        } => plan::execute_plan(cfg, client, *op_id, request, resume).await,
        OperationDuty::Submit { op_id, tx } => submit::execute_submit(cfg, client, *op_id, tx).await,
        OperationDuty::AwaitConfirmation {
            op_id,
            step,
            tx_hash,
            baseline,
            probe,
        } => {
            confirm::execute_await_confirmation(
                cfg, client, *op_id, *step, tx_hash, *baseline, probe,
            )
            .await
        }
    }
}
