//! The collaborator interfaces consumed by the orchestrator.

use async_trait::async_trait;
use lsd_primitives::{
    hub::{FeeSchedule, PoolInfo, UnstakeRecord},
    msgs::ChainMsg,
    staking::{DelegationRecord, TokenizeShareLock, TokenizedShareRecord, ValidatorSnapshot},
    tx::TxResponse,
    types::{Amount, ChainId, Coin},
};

use crate::errors::ClientResult;

/// Signs and broadcasts transactions on behalf of the connected wallet.
#[async_trait]
pub trait SigningClient: Send + Sync {
    /// Signs `msgs` as `sender` on `chain` and broadcasts the transaction.
    ///
    /// Resolves only after the user has approved or rejected the request; there is no deadline
    /// on the user's decision.
    async fn submit(
        &self,
        chain: &ChainId,
        sender: &str,
        msgs: &[ChainMsg],
    ) -> ClientResult<TxResponse>;
}

/// Bank module queries available on every chain.
#[async_trait]
pub trait BankQuery: Send + Sync {
    /// Balance of `address` in `denom`; cw20 tokens use the `cw20:<contract>` denom.
    async fn balance(&self, chain: &ChainId, address: &str, denom: &str) -> ClientResult<Amount>;

    /// All non-zero bank balances of `address`.
    async fn all_balances(&self, chain: &ChainId, address: &str) -> ClientResult<Vec<Coin>>;
}

/// Staking and liquid-staking queries against the source chain.
#[async_trait]
pub trait StakingQuery: Send + Sync {
    /// Snapshot of a single validator including the chain's liquid-staking params.
    async fn validator(&self, operator_address: &str) -> ClientResult<ValidatorSnapshot>;

    /// All delegations of `delegator`.
    async fn delegations(&self, delegator: &str) -> ClientResult<Vec<DelegationRecord>>;

    /// The delegation of `delegator` to `validator`, if any.
    async fn delegation(
        &self,
        delegator: &str,
        validator: &str,
    ) -> ClientResult<Option<DelegationRecord>>;

    /// Tokenize-share records owned by `owner`, oldest first.
    async fn tokenize_share_records(&self, owner: &str) -> ClientResult<Vec<TokenizedShareRecord>>;

    /// Whether `address` may tokenize shares.
    async fn tokenize_share_lock(&self, address: &str) -> ClientResult<TokenizeShareLock>;
}

/// Stake-manager and cw20 queries against the hub.
#[async_trait]
pub trait HubQuery: Send + Sync {
    /// The pool's current state.
    async fn pool_info(&self, pool_addr: &str) -> ClientResult<PoolInfo>;

    /// Unstake records of `user` in `pool_addr`.
    async fn unstake_records(&self, user: &str, pool_addr: &str)
        -> ClientResult<Vec<UnstakeRecord>>;

    /// cw20 allowance granted by `owner` to `spender` on `token`.
    async fn allowance(&self, token: &str, owner: &str, spender: &str) -> ClientResult<Amount>;

    /// Relayer fees charged for an interchain withdrawal.
    async fn withdraw_fees(&self) -> ClientResult<FeeSchedule>;
}

/// Everything the orchestrator needs from the outside world.
pub trait ChainClient: SigningClient + BankQuery + StakingQuery + HubQuery {}

impl<T> ChainClient for T where T: SigningClient + BankQuery + StakingQuery + HubQuery {}
