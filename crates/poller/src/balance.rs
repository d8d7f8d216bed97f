use lsd_chain_client::BankQuery;
use lsd_params::poll::PollParams;
use lsd_primitives::types::{Amount, ChainId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::retry::{poll_until, PollOutcome, Verdict};

/// The direction in which a balance is expected to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The balance must rise strictly above the baseline.
    Increase,

    /// The balance must fall strictly below the baseline.
    Decrease,
}

impl Direction {
    /// Whether `current` has moved away from `baseline` in this direction.
    pub const fn is_favorable(&self, baseline: Amount, current: Amount) -> bool {
        match self {
            Self::Increase => current > baseline,
            Self::Decrease => current < baseline,
        }
    }
}

/// Polls the balance of `address` in `denom` until it moves from `baseline` in `direction`.
pub async fn await_balance_change<C>(
    client: &C,
    params: &PollParams,
    chain: &ChainId,
    address: &str,
    denom: &str,
    direction: Direction,
    baseline: Amount,
) -> PollOutcome<Amount>
where
    C: BankQuery + ?Sized,
{
    info!(%chain, %address, %denom, ?direction, %baseline, "awaiting balance change");

    poll_until(
        params,
        || client.balance(chain, address, denom),
        |current| {
            if direction.is_favorable(baseline, *current) {
                Verdict::Confirmed
            } else {
                Verdict::Pending
            }
        },
    )
    .await
}
