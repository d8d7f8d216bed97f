//! Computes which unstake records can be withdrawn and how long the rest must wait.

use std::time::Duration;

use lsd_primitives::{
    hub::UnstakeRecord,
    types::{Amount, Era, UnstakeIndex},
};
use serde::{Deserialize, Serialize};

/// Withdrawal eligibility of a user's unstake records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalInfo {
    /// Sum of the amounts of matured records.
    pub withdrawable: Amount,

    /// Sum of the amounts of all records.
    pub overall: Amount,

    /// Indices of the matured records.
    pub indices: Vec<UnstakeIndex>,

    /// Eras until the next record matures, if any is still unbonding.
    pub remaining_eras: Option<u64>,

    /// Time until the next record matures; zero if none is unbonding.
    pub remaining: Duration,
}

impl WithdrawalInfo {
    /// Classifies `records` against the pool's current era.
    ///
    /// A record is withdrawable once `record.era + unbonding_period <= current_era`.
    pub fn compute(
        current_era: Era,
        unbonding_period: u64,
        era_seconds: u64,
        records: &[UnstakeRecord],
    ) -> Self {
        let mut info = Self::default();

        for record in records {
            info.overall = info.overall.saturating_add(record.amount);
            let matures_at = record.era.saturating_add(unbonding_period);
            if matures_at <= current_era {
                info.withdrawable = info.withdrawable.saturating_add(record.amount);
                info.indices.push(record.index);
            } else {
                let left = matures_at - current_era;
                info.remaining_eras = Some(info.remaining_eras.map_or(left, |min| min.min(left)));
            }
        }

        info.remaining = Duration::from_secs(
            info.remaining_eras
                .unwrap_or(0)
                .saturating_mul(era_seconds),
        );
        info
    }

    /// Whether anything can be withdrawn right now.
    pub fn has_withdrawable(&self) -> bool {
        self.withdrawable > 0 && !self.indices.is_empty()
    }
}
