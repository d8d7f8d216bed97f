//! A scriptable in-memory chain.

use std::{
    collections::{BTreeMap, VecDeque},
    sync::Arc,
};

use async_trait::async_trait;
use lsd_chain_client::{
    BankQuery, ClientError, ClientResult, HubQuery, SigningClient, StakingQuery,
};
use lsd_params::Params;
use lsd_planner::{bridge::bridge_denom, quote::derivative_for_stake};
use lsd_primitives::{
    hub::{cw20_denom, FeeSchedule, PoolInfo, UnstakeRecord, UnstakeStatus},
    msgs::{ChainMsg, Cw20Msg, StakeHook, StakeManagerMsg, WasmMemo},
    staking::{
        share_denom, DelegationRecord, TokenizeShareLock, TokenizedShareRecord, ValidatorSnapshot,
    },
    tx::TxResponse,
    types::{Address, Amount, ChainId, Coin, RecordId, TxHash, UnstakeIndex},
};
use parking_lot::Mutex;

/// Chain error code reported when a message fails to execute, e.g. a debit exceeding the balance.
pub const TX_FAILED_CODE: u32 = 5;

/// What the next call to [`SigningClient::submit`] does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Broadcast and execute the messages.
    Accept,

    /// Broadcast, but have the chain refuse the transaction.
    ChainError {
        /// Non-zero response code.
        code: u32,
        /// Diagnostic log.
        raw_log: String,
    },

    /// Fail before anything is broadcast, e.g. a user rejection.
    Fail(ClientError),
}

/// Whether accepted transactions change chain state right away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Effects {
    /// Effects are applied as the transaction is accepted.
    #[default]
    Apply,

    /// Effects are held back until [`MockChain::release_withheld`] is called.
    Withhold,
}

/// A recorded call to [`SigningClient::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Chain the transaction was submitted to.
    pub chain: ChainId,
    /// Signer.
    pub sender: Address,
    /// Submitted messages.
    pub msgs: Vec<ChainMsg>,
    /// Hash handed back, if the transaction was broadcast.
    pub hash: Option<TxHash>,
}

#[derive(Debug, Clone, Default)]
struct Delegation {
    amount: Amount,
    validator_bond: bool,
}

#[derive(Debug, Clone, Default)]
struct State {
    balances: BTreeMap<(ChainId, Address, String), Amount>,
    validators: BTreeMap<Address, ValidatorSnapshot>,
    delegations: BTreeMap<(Address, Address), Delegation>,
    records: BTreeMap<RecordId, TokenizedShareRecord>,
    next_record_id: RecordId,
    locks: BTreeMap<Address, TokenizeShareLock>,
    pools: BTreeMap<Address, PoolInfo>,
    unstakes: BTreeMap<(Address, UnstakeIndex), (Address, UnstakeRecord)>,
    next_unstake_index: UnstakeIndex,
    allowances: BTreeMap<(Address, Address, Address), Amount>,
    fees: FeeSchedule,
    withdraw_reverts: bool,
}

#[derive(Debug, Default)]
struct Inner {
    state: State,
    script: VecDeque<SubmitOutcome>,
    submissions: Vec<Submission>,
    effects: Effects,
    withheld: Vec<(ChainId, Vec<ChainMsg>)>,
    tx_counter: u64,
    failing_queries: u32,
}

/// In-memory source chain, hub and bridge targets behind the client traits.
///
/// Clones share the same state, so a test can keep a handle while an executor owns another.
#[derive(Debug, Clone)]
pub struct MockChain {
    source: ChainId,
    hub: ChainId,
    staking_denom: String,
    inner: Arc<Mutex<Inner>>,
}

impl MockChain {
    /// Creates an empty chain using the chain ids and staking denom in `params`.
    pub fn new(params: &Params) -> Self {
        let inner = Inner {
            state: State {
                next_record_id: 1,
                next_unstake_index: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        Self {
            source: params.source.chain_id.clone(),
            hub: params.hub.chain_id.clone(),
            staking_denom: params.source.staking_denom.clone(),
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Sets the bank balance of `address` in `denom`.
    pub fn set_balance(&self, chain: &ChainId, address: &str, denom: &str, amount: Amount) {
        self.inner
            .lock()
            .state
            .balances
            .insert((chain.clone(), address.to_owned(), denom.to_owned()), amount);
    }

    /// Current bank balance, bypassing query failure injection.
    pub fn balance_of(&self, chain: &ChainId, address: &str, denom: &str) -> Amount {
        self.inner
            .lock()
            .state
            .balances
            .get(&(chain.clone(), address.to_owned(), denom.to_owned()))
            .copied()
            .unwrap_or(0)
    }

    /// Adds or replaces a validator.
    pub fn add_validator(&self, validator: ValidatorSnapshot) {
        self.inner
            .lock()
            .state
            .validators
            .insert(validator.operator_address.clone(), validator);
    }

    /// Adds `amount` to the delegation of `delegator` with `validator`.
    pub fn add_delegation(&self, delegator: &str, validator: &str, amount: Amount) {
        let mut inner = self.inner.lock();
        inner
            .state
            .delegations
            .entry((delegator.to_owned(), validator.to_owned()))
            .or_default()
            .amount += amount;
    }

    /// Flags the delegation of `delegator` with `validator` as a validator bond.
    pub fn mark_validator_bond(&self, delegator: &str, validator: &str) {
        self.inner
            .lock()
            .state
            .delegations
            .entry((delegator.to_owned(), validator.to_owned()))
            .or_default()
            .validator_bond = true;
    }

    /// Current delegation amount.
    pub fn delegation_of(&self, delegator: &str, validator: &str) -> Amount {
        self.inner
            .lock()
            .state
            .delegations
            .get(&(delegator.to_owned(), validator.to_owned()))
            .map_or(0, |d| d.amount)
    }

    /// Creates a tokenize-share record owned by `owner` holding `amount` share tokens.
    pub fn add_share_record(&self, owner: &str, validator: &str, amount: Amount) -> RecordId {
        let mut inner = self.inner.lock();
        let source = self.source.clone();
        create_record(&mut inner.state, &source, owner, validator, amount)
    }

    /// Sets the tokenize-share lock of `address`.
    pub fn set_lock(&self, address: &str, lock: TokenizeShareLock) {
        self.inner
            .lock()
            .state
            .locks
            .insert(address.to_owned(), lock);
    }

    /// Adds or replaces a pool.
    pub fn set_pool(&self, pool: PoolInfo) {
        self.inner
            .lock()
            .state
            .pools
            .insert(pool.pool_addr.clone(), pool);
    }

    /// Moves the pool to `era`.
    pub fn set_era(&self, pool_addr: &str, era: u64) {
        if let Some(pool) = self.inner.lock().state.pools.get_mut(pool_addr) {
            pool.era = era;
        }
    }

    /// Adds an unstake record and returns its index.
    pub fn add_unstake_record(
        &self,
        user: &str,
        pool_addr: &str,
        amount: Amount,
        era: u64,
    ) -> UnstakeIndex {
        let mut inner = self.inner.lock();
        push_unstake(&mut inner.state, user, pool_addr, amount, era)
    }

    /// Unstake records of `user`, bypassing query failure injection.
    pub fn unstakes_of(&self, user: &str) -> Vec<UnstakeRecord> {
        self.inner
            .lock()
            .state
            .unstakes
            .values()
            .filter(|(owner, _)| owner == user)
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Sets the cw20 allowance granted by `owner` to `spender` on `token`.
    pub fn set_allowance(&self, token: &str, owner: &str, spender: &str, amount: Amount) {
        self.inner.lock().state.allowances.insert(
            (token.to_owned(), owner.to_owned(), spender.to_owned()),
            amount,
        );
    }

    /// Sets the relayer fee schedule.
    pub fn set_fees(&self, fees: FeeSchedule) {
        self.inner.lock().state.fees = fees;
    }

    /// Makes withdrawals flip their records back to `default` instead of removing them.
    pub fn set_withdraw_reverts(&self, reverts: bool) {
        self.inner.lock().state.withdraw_reverts = reverts;
    }

    /// Queues the outcome of the next submission. Unscripted submissions are accepted.
    pub fn script_submit(&self, outcome: SubmitOutcome) {
        self.inner.lock().script.push_back(outcome);
    }

    /// Controls whether accepted transactions take effect immediately.
    pub fn set_effects(&self, effects: Effects) {
        self.inner.lock().effects = effects;
    }

    /// Applies every withheld transaction in submission order.
    ///
    /// Transactions that would now fail are dropped.
    pub fn release_withheld(&self) {
        let mut inner = self.inner.lock();
        let withheld = std::mem::take(&mut inner.withheld);
        for (chain, msgs) in withheld {
            let mut next = inner.state.clone();
            if self.apply_all(&mut next, &chain, &msgs).is_ok() {
                inner.state = next;
            }
        }
    }

    /// Makes the next `count` queries fail with a transport error.
    pub fn fail_next_queries(&self, count: u32) {
        self.inner.lock().failing_queries = count;
    }

    /// Every submission so far, in order.
    pub fn submissions(&self) -> Vec<Submission> {
        self.inner.lock().submissions.clone()
    }

    fn query<T>(&self, f: impl FnOnce(&State) -> ClientResult<T>) -> ClientResult<T> {
        let mut inner = self.inner.lock();
        if inner.failing_queries > 0 {
            inner.failing_queries -= 1;
            return Err(ClientError::Transport("connection reset".to_owned()));
        }
        f(&inner.state)
    }

    fn apply_all(&self, state: &mut State, chain: &ChainId, msgs: &[ChainMsg]) -> Result<(), String> {
        msgs.iter().try_for_each(|msg| self.apply(state, chain, msg))
    }

    fn apply(&self, state: &mut State, chain: &ChainId, msg: &ChainMsg) -> Result<(), String> {
        match msg {
            ChainMsg::BeginRedelegate {
                delegator_address,
                validator_src_address,
                validator_dst_address,
                amount,
            } => {
                undelegate(state, delegator_address, validator_src_address, amount.amount)?;
                state
                    .delegations
                    .entry((delegator_address.clone(), validator_dst_address.clone()))
                    .or_default()
                    .amount += amount.amount;
            }
            ChainMsg::TokenizeShares {
                delegator_address,
                validator_address,
                amount,
                tokenized_share_owner,
            } => {
                if matches!(
                    state.locks.get(delegator_address),
                    Some(TokenizeShareLock::Locked | TokenizeShareLock::LockExpiring { .. })
                ) {
                    return Err("tokenize shares are locked".to_owned());
                }
                undelegate(state, delegator_address, validator_address, amount.amount)?;
                create_record(
                    state,
                    &self.source,
                    tokenized_share_owner,
                    validator_address,
                    amount.amount,
                );
            }
            ChainMsg::RedeemTokensForShares {
                delegator_address,
                amount,
            } => {
                debit(state, chain, delegator_address, &amount.denom, amount.amount)?;
                let record = state
                    .records
                    .values()
                    .find(|record| record.share_denom() == amount.denom)
                    .cloned()
                    .ok_or_else(|| format!("no record for {}", amount.denom))?;
                let tokens = state
                    .validators
                    .get(&record.validator)
                    .and_then(|v| v.shares_to_tokens(amount.amount))
                    .unwrap_or(amount.amount);
                state
                    .delegations
                    .entry((delegator_address.clone(), record.validator.clone()))
                    .or_default()
                    .amount += tokens;
                if balance(state, chain, delegator_address, &amount.denom) == 0 {
                    state.records.remove(&record.id);
                }
            }
            ChainMsg::IbcTransfer {
                source_channel,
                token,
                sender,
                receiver,
                memo,
                ..
            } => {
                debit(state, chain, sender, &token.denom, token.amount)?;
                self.deliver_transfer(state, source_channel, token, receiver, memo)?;
            }
            ChainMsg::ExecuteContract {
                sender,
                contract,
                msg,
                funds,
            } => {
                for coin in funds {
                    debit(state, chain, sender, &coin.denom, coin.amount)?;
                }
                self.execute(state, chain, sender, contract, msg)?;
            }
        }
        Ok(())
    }

    fn deliver_transfer(
        &self,
        state: &mut State,
        source_channel: &str,
        token: &Coin,
        receiver: &str,
        memo: &str,
    ) -> Result<(), String> {
        if !memo.is_empty() {
            let memo: WasmMemo = serde_json::from_str(memo).map_err(|e| e.to_string())?;
            let (neutron_address, pool_addr) = match &memo.wasm.msg {
                StakeHook::Stake {
                    neutron_address,
                    pool_addr,
                }
                | StakeHook::StakeLsm {
                    neutron_address,
                    pool_addr,
                } => (neutron_address, pool_addr),
            };
            let pool = state
                .pools
                .get(pool_addr)
                .cloned()
                .ok_or_else(|| format!("unknown pool {pool_addr}"))?;
            let minted = derivative_for_stake(token.amount, pool.rate)
                .ok_or_else(|| "rate overflow".to_owned())?;
            credit(state, &self.hub, neutron_address, &pool.lsd_denom(), minted);
            return Ok(());
        }

        let lsd = state
            .pools
            .values()
            .find(|pool| bridge_denom(source_channel, &pool.lsd_token) == token.denom)
            .map(PoolInfo::lsd_denom);
        if let Some(lsd) = lsd {
            credit(state, &self.hub, receiver, &lsd, token.amount);
        }
        Ok(())
    }

    fn execute(
        &self,
        state: &mut State,
        chain: &ChainId,
        sender: &str,
        contract: &str,
        msg: &serde_json::Value,
    ) -> Result<(), String> {
        if let Ok(cw20) = serde_json::from_value::<Cw20Msg>(msg.clone()) {
            match cw20 {
                Cw20Msg::IncreaseAllowance { spender, amount } => {
                    *state
                        .allowances
                        .entry((contract.to_owned(), sender.to_owned(), spender))
                        .or_default() += amount;
                }
                Cw20Msg::Send { amount, .. } => {
                    debit(state, chain, sender, &cw20_denom(contract), amount)?;
                }
            }
            return Ok(());
        }

        match serde_json::from_value::<StakeManagerMsg>(msg.clone()).map_err(|e| e.to_string())? {
            StakeManagerMsg::Unstake { amount, pool_addr } => {
                let pool = state
                    .pools
                    .get(&pool_addr)
                    .cloned()
                    .ok_or_else(|| format!("unknown pool {pool_addr}"))?;
                let key = (pool.lsd_token.clone(), sender.to_owned(), contract.to_owned());
                let allowance = state.allowances.get(&key).copied().unwrap_or(0);
                if allowance < amount {
                    return Err("insufficient allowance".to_owned());
                }
                state.allowances.insert(key, allowance - amount);
                debit(state, chain, sender, &pool.lsd_denom(), amount)?;
                push_unstake(state, sender, &pool_addr, amount, pool.era);
            }
            StakeManagerMsg::Withdraw {
                unstake_index_list,
                ..
            } => {
                for index in unstake_index_list {
                    let key = (sender.to_owned(), index);
                    if !state.unstakes.contains_key(&key) {
                        return Err(format!("unstake record {index} not found"));
                    }
                    // a failed interchain withdrawal leaves the record claimable again
                    if state.withdraw_reverts {
                        if let Some((_, record)) = state.unstakes.get_mut(&key) {
                            record.status = UnstakeStatus::Default;
                        }
                    } else {
                        state.unstakes.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }

    fn next_hash(inner: &mut Inner) -> TxHash {
        inner.tx_counter += 1;
        TxHash::new(format!("{:064X}", inner.tx_counter))
    }
}

fn balance(state: &State, chain: &ChainId, address: &str, denom: &str) -> Amount {
    state
        .balances
        .get(&(chain.clone(), address.to_owned(), denom.to_owned()))
        .copied()
        .unwrap_or(0)
}

fn credit(state: &mut State, chain: &ChainId, address: &str, denom: &str, amount: Amount) {
    *state
        .balances
        .entry((chain.clone(), address.to_owned(), denom.to_owned()))
        .or_default() += amount;
}

fn debit(
    state: &mut State,
    chain: &ChainId,
    address: &str,
    denom: &str,
    amount: Amount,
) -> Result<(), String> {
    let key = (chain.clone(), address.to_owned(), denom.to_owned());
    let current = state.balances.get(&key).copied().unwrap_or(0);
    let left = current
        .checked_sub(amount)
        .ok_or_else(|| format!("insufficient funds: {current}{denom} < {amount}{denom}"))?;
    state.balances.insert(key, left);
    Ok(())
}

fn undelegate(
    state: &mut State,
    delegator: &str,
    validator: &str,
    amount: Amount,
) -> Result<(), String> {
    let delegation = state
        .delegations
        .get_mut(&(delegator.to_owned(), validator.to_owned()))
        .ok_or_else(|| format!("no delegation to {validator}"))?;
    delegation.amount = delegation
        .amount
        .checked_sub(amount)
        .ok_or_else(|| format!("insufficient delegation to {validator}"))?;
    Ok(())
}

fn create_record(
    state: &mut State,
    source: &ChainId,
    owner: &str,
    validator: &str,
    amount: Amount,
) -> RecordId {
    let id = state.next_record_id;
    state.next_record_id += 1;
    state.records.insert(
        id,
        TokenizedShareRecord {
            id,
            owner: owner.to_owned(),
            module_account: format!("cosmos1module{id}"),
            validator: validator.to_owned(),
        },
    );
    credit(state, source, owner, &share_denom(validator, id), amount);
    id
}

fn push_unstake(
    state: &mut State,
    user: &str,
    pool_addr: &str,
    amount: Amount,
    era: u64,
) -> UnstakeIndex {
    let index = state.next_unstake_index;
    state.next_unstake_index += 1;
    state.unstakes.insert(
        (user.to_owned(), index),
        (
            pool_addr.to_owned(),
            UnstakeRecord {
                index,
                pool_addr: pool_addr.to_owned(),
                amount,
                era,
                status: UnstakeStatus::Default,
            },
        ),
    );
    index
}

#[async_trait]
impl SigningClient for MockChain {
    async fn submit(
        &self,
        chain: &ChainId,
        sender: &str,
        msgs: &[ChainMsg],
    ) -> ClientResult<TxResponse> {
        let mut inner = self.inner.lock();
        let outcome = inner.script.pop_front().unwrap_or(SubmitOutcome::Accept);

        let result = match outcome {
            SubmitOutcome::Fail(err) => Err(err),
            SubmitOutcome::ChainError { code, raw_log } => Ok(TxResponse {
                hash: Self::next_hash(&mut inner),
                code,
                raw_log,
            }),
            SubmitOutcome::Accept => {
                let hash = Self::next_hash(&mut inner);
                let mut next = inner.state.clone();
                match self.apply_all(&mut next, chain, msgs) {
                    Ok(()) => {
                        match inner.effects {
                            Effects::Apply => inner.state = next,
                            Effects::Withhold => {
                                inner.withheld.push((chain.clone(), msgs.to_vec()));
                            }
                        }
                        Ok(TxResponse {
                            hash,
                            code: 0,
                            raw_log: String::new(),
                        })
                    }
                    Err(raw_log) => Ok(TxResponse {
                        hash,
                        code: TX_FAILED_CODE,
                        raw_log,
                    }),
                }
            }
        };

        inner.submissions.push(Submission {
            chain: chain.clone(),
            sender: sender.to_owned(),
            msgs: msgs.to_vec(),
            hash: result.as_ref().ok().map(|response| response.hash.clone()),
        });
        result
    }
}

#[async_trait]
impl BankQuery for MockChain {
    async fn balance(&self, chain: &ChainId, address: &str, denom: &str) -> ClientResult<Amount> {
        self.query(|state| Ok(balance(state, chain, address, denom)))
    }

    async fn all_balances(&self, chain: &ChainId, address: &str) -> ClientResult<Vec<Coin>> {
        self.query(|state| {
            Ok(state
                .balances
                .iter()
                .filter(|((c, a, _), amount)| c == chain && a == address && **amount > 0)
                .map(|((_, _, denom), amount)| Coin::new(denom.clone(), *amount))
                .collect())
        })
    }
}

#[async_trait]
impl StakingQuery for MockChain {
    async fn validator(&self, operator_address: &str) -> ClientResult<ValidatorSnapshot> {
        self.query(|state| {
            state
                .validators
                .get(operator_address)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("validator {operator_address}")))
        })
    }

    async fn delegations(&self, delegator: &str) -> ClientResult<Vec<DelegationRecord>> {
        self.query(|state| {
            Ok(state
                .delegations
                .iter()
                .filter(|((d, _), delegation)| d == delegator && delegation.amount > 0)
                .map(|((d, v), delegation)| self.delegation_record(d, v, delegation))
                .collect())
        })
    }

    async fn delegation(
        &self,
        delegator: &str,
        validator: &str,
    ) -> ClientResult<Option<DelegationRecord>> {
        self.query(|state| {
            Ok(state
                .delegations
                .get(&(delegator.to_owned(), validator.to_owned()))
                .map(|delegation| self.delegation_record(delegator, validator, delegation)))
        })
    }

    async fn tokenize_share_records(&self, owner: &str) -> ClientResult<Vec<TokenizedShareRecord>> {
        self.query(|state| {
            Ok(state
                .records
                .values()
                .filter(|record| record.owner == owner)
                .cloned()
                .collect())
        })
    }

    async fn tokenize_share_lock(&self, address: &str) -> ClientResult<TokenizeShareLock> {
        self.query(|state| {
            Ok(state
                .locks
                .get(address)
                .cloned()
                .unwrap_or(TokenizeShareLock::Unlocked))
        })
    }
}

impl MockChain {
    fn delegation_record(
        &self,
        delegator: &str,
        validator: &str,
        delegation: &Delegation,
    ) -> DelegationRecord {
        DelegationRecord {
            delegator: delegator.to_owned(),
            validator: validator.to_owned(),
            balance: Coin::new(self.staking_denom.clone(), delegation.amount),
            validator_bond: delegation.validator_bond,
        }
    }
}

#[async_trait]
impl HubQuery for MockChain {
    async fn pool_info(&self, pool_addr: &str) -> ClientResult<PoolInfo> {
        self.query(|state| {
            state
                .pools
                .get(pool_addr)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("pool {pool_addr}")))
        })
    }

    async fn unstake_records(
        &self,
        user: &str,
        pool_addr: &str,
    ) -> ClientResult<Vec<UnstakeRecord>> {
        self.query(|state| {
            Ok(state
                .unstakes
                .iter()
                .filter(|((owner, _), (pool, _))| owner == user && pool == pool_addr)
                .map(|(_, (_, record))| record.clone())
                .collect())
        })
    }

    async fn allowance(&self, token: &str, owner: &str, spender: &str) -> ClientResult<Amount> {
        self.query(|state| {
            Ok(state
                .allowances
                .get(&(token.to_owned(), owner.to_owned(), spender.to_owned()))
                .copied()
                .unwrap_or(0))
        })
    }

    async fn withdraw_fees(&self) -> ClientResult<FeeSchedule> {
        self.query(|state| Ok(state.fees.clone()))
    }
}
