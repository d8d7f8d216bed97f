use anyhow::Result;
use lsd_planner::withdrawal::WithdrawalInfo;
use lsd_primitives::hub::UnstakeRecord;
use tracing::info;

use crate::snapshot::ChainSnapshot;

/// Classifies the snapshot's unstake records that belong to the snapshot's pool.
pub(crate) fn handle_withdraw_info(snapshot: &ChainSnapshot) -> Result<WithdrawalInfo> {
    let pool = snapshot.pool()?;
    let records: Vec<UnstakeRecord> = snapshot
        .unstake_records
        .iter()
        .filter(|record| record.pool_addr == pool.pool_addr)
        .cloned()
        .collect();

    let info = WithdrawalInfo::compute(pool.era, pool.unbonding_period, pool.era_seconds, &records);
    info!(
        era = pool.era,
        records = records.len(),
        withdrawable = %info.withdrawable,
        "computed withdrawal eligibility"
    );
    Ok(info)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::snapshot::tests::SAMPLE;

    #[test]
    fn matured_records_of_the_pool_are_withdrawable() {
        let snapshot = ChainSnapshot::parse(SAMPLE).unwrap();

        let info = handle_withdraw_info(&snapshot).unwrap();

        assert_eq!(info.withdrawable, 5);
        assert_eq!(info.overall, 8);
        assert_eq!(info.indices, vec![1]);
        assert_eq!(info.remaining_eras, Some(4));
        assert_eq!(info.remaining, Duration::from_secs(4 * 86_400));
    }

    #[test]
    fn pool_is_required() {
        let snapshot = ChainSnapshot::parse("{}").unwrap();

        assert!(handle_withdraw_info(&snapshot).is_err());
    }
}
