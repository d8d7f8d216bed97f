use anyhow::Result;
use lsd_planner::eligibility::{select_validator, ValidatorSelection};
use lsd_primitives::types::Amount;
use rand::Rng;
use tracing::info;

use crate::snapshot::ChainSnapshot;

pub(crate) fn handle_eligible<R: Rng + ?Sized>(
    snapshot: &ChainSnapshot,
    amount: Amount,
    rng: &mut R,
) -> Result<ValidatorSelection> {
    info!(%amount, validators = snapshot.validators.len(), "checking validator eligibility");
    Ok(select_validator(amount, &snapshot.validators, rng)?)
}
