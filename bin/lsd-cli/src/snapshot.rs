//! Chain state read from a JSON file, so that plans can be inspected without a node.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use lsd_primitives::{
    hub::{PoolInfo, UnstakeRecord},
    staking::{DelegationRecord, ValidatorSnapshot},
};
use serde::Deserialize;

/// Everything the offline commands may need. Sections a command does not use can be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ChainSnapshot {
    #[serde(default)]
    pub(crate) validators: Vec<ValidatorSnapshot>,

    #[serde(default)]
    pub(crate) delegations: Vec<DelegationRecord>,

    #[serde(default)]
    pub(crate) pool: Option<PoolInfo>,

    #[serde(default)]
    pub(crate) unstake_records: Vec<UnstakeRecord>,
}

impl ChainSnapshot {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid snapshot {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub(crate) fn pool(&self) -> Result<&PoolInfo> {
        self.pool.as_ref().context("snapshot has no pool section")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Validator `a` is saturated, `b` has no bond ceiling.
    pub(crate) const SAMPLE: &str = r#"{
        "validators": [
            {
                "operator_address": "cosmosvaloper1a",
                "tokens": "1000000",
                "delegator_shares": "1000000",
                "liquid_shares": "250000",
                "validator_bond_shares": "0",
                "bond_factor": "250",
                "liquid_staking_cap": "0.25"
            },
            {
                "operator_address": "cosmosvaloper1b",
                "tokens": "1000000",
                "delegator_shares": "1000000",
                "liquid_shares": "0",
                "validator_bond_shares": "0",
                "bond_factor": "-1",
                "liquid_staking_cap": "0.5"
            }
        ],
        "delegations": [
            {
                "delegator": "cosmos1user",
                "validator": "cosmosvaloper1a",
                "balance": { "denom": "uatom", "amount": "100" }
            },
            {
                "delegator": "cosmos1other",
                "validator": "cosmosvaloper1a",
                "balance": { "denom": "uatom", "amount": "900" }
            }
        ],
        "pool": {
            "pool_addr": "cosmos1pool",
            "lsd_token": "neutron1lsd",
            "era": 16,
            "unbonding_period": 5,
            "era_seconds": 86400,
            "rate": "1.25",
            "validator_addrs": ["cosmosvaloper1a", "cosmosvaloper1b"]
        },
        "unstake_records": [
            { "index": 1, "pool_addr": "cosmos1pool", "amount": "5", "era": 10, "status": "default" },
            { "index": 2, "pool_addr": "cosmos1pool", "amount": "3", "era": 15, "status": "default" },
            { "index": 3, "pool_addr": "cosmos1elsewhere", "amount": "7", "era": 1, "status": "default" }
        ]
    }"#;

    #[test]
    fn sample_parses() {
        let snapshot = ChainSnapshot::parse(SAMPLE).unwrap();

        assert_eq!(snapshot.validators.len(), 2);
        assert_eq!(snapshot.delegations.len(), 2);
        assert!(!snapshot.delegations[0].validator_bond);
        assert_eq!(snapshot.pool().unwrap().era, 16);
        assert_eq!(snapshot.unstake_records.len(), 3);
    }

    #[test]
    fn sections_are_optional() {
        let snapshot = ChainSnapshot::parse("{}").unwrap();

        assert!(snapshot.validators.is_empty());
        assert!(snapshot.pool().is_err());
    }
}
