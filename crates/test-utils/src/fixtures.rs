//! Shared test constants and a pre-populated [`MockChain`].
//!
//! Validator [`VALIDATOR_A`] is saturated and never eligible, [`VALIDATOR_B`] accepts anything up
//! to its cap. The user starts with native tokens, a delegation to A, derivative tokens and fee
//! tokens on the hub.

use std::time::Duration;

use lsd_params::{
    bridge::{BridgeParams, BridgeTarget},
    chains::{HubParams, SourceChainParams},
    default::IBC_TIMEOUT,
    poll::PollParams,
    signing::SigningParams,
    Params,
};
use lsd_primitives::{
    decimal::{BondFactor, Dec},
    hub::{cw20_denom, PoolInfo},
    staking::ValidatorSnapshot,
    types::{Amount, ChainId},
};

use crate::chain::MockChain;

// ===== Shared Test Constants =====

/// Chain id of the source chain.
pub const SOURCE_CHAIN: &str = "cosmoshub-4";

/// Chain id of the hub.
pub const HUB_CHAIN: &str = "neutron-1";

/// Chain id of the single bridge target.
pub const TARGET_CHAIN: &str = "stafihub-1";

/// Native staking denom of the source chain.
pub const STAKING_DENOM: &str = "uatom";

/// Fee denom of the hub.
pub const FEE_DENOM: &str = "untrn";

/// Source chain channel to the hub.
pub const STAKE_CHANNEL: &str = "channel-569";

/// Hub channel to the bridge target.
pub const HUB_BRIDGE_CHANNEL: &str = "channel-1551";

/// Bridge target channel to the hub.
pub const REMOTE_BRIDGE_CHANNEL: &str = "channel-71";

/// Stake-manager contract on the hub.
pub const STAKE_MANAGER: &str = "neutron1manager";

/// Pool address.
pub const POOL_ADDR: &str = "cosmos1pool";

/// cw20 contract of the derivative token.
pub const LSD_TOKEN: &str = "neutron1lsd";

/// cw20-ics20 contract on the hub.
pub const ICS20_CONTRACT: &str = "neutron1ics20";

/// The user's source chain account.
pub const USER_SOURCE: &str = "cosmos1user";

/// The user's hub account.
pub const USER_HUB: &str = "neutron1user";

/// The user's bridge target account.
pub const USER_TARGET: &str = "stafi1user";

/// Saturated validator, never eligible.
pub const VALIDATOR_A: &str = "cosmosvaloper1a";

/// Validator with free liquid-staking capacity.
pub const VALIDATOR_B: &str = "cosmosvaloper1b";

/// Initial native balance of the user.
pub const USER_NATIVE_BALANCE: Amount = 10_000;

/// Initial delegation of the user to [`VALIDATOR_A`].
pub const USER_DELEGATION: Amount = 500;

/// Initial derivative balance of the user on the hub.
pub const USER_LSD_BALANCE: Amount = 2_000;

/// Initial fee-denom balance of the user on the hub.
pub const USER_FEE_BALANCE: Amount = 1_000_000;

/// Pool era at the start of every test.
pub const POOL_ERA: u64 = 100;

/// Unbonding period of the pool, in eras.
pub const UNBONDING_ERAS: u64 = 4;

/// Length of an era in seconds.
pub const ERA_SECONDS: u64 = 86_400;

// ===== Shared Test Helpers =====

/// [`SOURCE_CHAIN`] as a [`ChainId`].
pub fn source_chain() -> ChainId {
    ChainId::new(SOURCE_CHAIN)
}

/// [`HUB_CHAIN`] as a [`ChainId`].
pub fn hub_chain() -> ChainId {
    ChainId::new(HUB_CHAIN)
}

/// [`TARGET_CHAIN`] as a [`ChainId`].
pub fn target_chain() -> ChainId {
    ChainId::new(TARGET_CHAIN)
}

/// Bank denom of the derivative token on the hub.
pub fn lsd_denom() -> String {
    cw20_denom(LSD_TOKEN)
}

/// Parameters wiring together the constants above, with the default polling policy.
pub fn test_params() -> Params {
    Params {
        notice_capacity: 10,
        source: SourceChainParams {
            chain_id: source_chain(),
            staking_denom: STAKING_DENOM.to_owned(),
            stake_channel: Some(STAKE_CHANNEL.to_owned()),
        },
        hub: HubParams {
            chain_id: hub_chain(),
            fee_denom: FEE_DENOM.to_owned(),
            stake_manager: STAKE_MANAGER.to_owned(),
            pool_addr: POOL_ADDR.to_owned(),
            min_fee_reserve: 50_000,
        },
        bridge: BridgeParams {
            ics20_contract: Some(ICS20_CONTRACT.to_owned()),
            targets: vec![BridgeTarget {
                chain_id: target_chain(),
                hub_channel: HUB_BRIDGE_CHANNEL.to_owned(),
                remote_channel: REMOTE_BRIDGE_CHANNEL.to_owned(),
            }],
        },
        poll: PollParams {
            interval: Duration::from_millis(3_000),
            max_attempts: 20,
        },
        signing: SigningParams::default(),
        ibc_timeout: IBC_TIMEOUT,
    }
}

/// The pool at [`POOL_ERA`] with a rate of 1.25 tokens per derivative.
pub fn test_pool() -> PoolInfo {
    PoolInfo {
        pool_addr: POOL_ADDR.to_owned(),
        lsd_token: LSD_TOKEN.to_owned(),
        era: POOL_ERA,
        unbonding_period: UNBONDING_ERAS,
        era_seconds: ERA_SECONDS,
        rate: Dec::from_raw(1_250_000_000_000_000_000),
        validator_addrs: vec![VALIDATOR_A.to_owned(), VALIDATOR_B.to_owned()],
    }
}

/// A validator with one million tokens and shares.
pub fn validator(address: &str, liquid_shares: Amount, cap_percent: u128) -> ValidatorSnapshot {
    let whole = |amount: Amount| Dec::from_raw(amount * 10u128.pow(18));
    ValidatorSnapshot {
        operator_address: address.to_owned(),
        tokens: 1_000_000,
        delegator_shares: whole(1_000_000),
        liquid_shares: whole(liquid_shares),
        validator_bond_shares: Dec::ZERO,
        bond_factor: BondFactor::Unlimited,
        liquid_staking_cap: Dec::from_raw(cap_percent * 10u128.pow(16)),
    }
}

/// A chain holding the pool, both validators and the user's starting balances.
pub fn seeded_chain() -> MockChain {
    let chain = MockChain::new(&test_params());
    chain.set_pool(test_pool());
    chain.add_validator(validator(VALIDATOR_A, 250_000, 25));
    chain.add_validator(validator(VALIDATOR_B, 0, 50));
    chain.add_delegation(USER_SOURCE, VALIDATOR_A, USER_DELEGATION);
    chain.set_balance(
        &source_chain(),
        USER_SOURCE,
        STAKING_DENOM,
        USER_NATIVE_BALANCE,
    );
    chain.set_balance(&hub_chain(), USER_HUB, &lsd_denom(), USER_LSD_BALANCE);
    chain.set_balance(&hub_chain(), USER_HUB, FEE_DENOM, USER_FEE_BALANCE);
    chain
}
