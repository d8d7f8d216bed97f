//! Planned transactions and the data needed to resume an operation midway.

use std::fmt;

use lsd_poller::Direction;
use lsd_primitives::{
    msgs::ChainMsg,
    staking::{LsmShare, TokenizedShareRecord},
    types::{Address, Amount, ChainId, RecordId, TxHash, UnstakeIndex},
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// The transactions an operation is made of.
///
/// Single-transaction operations only ever use [`Step::Send`]. Two-step operations first
/// broadcast a [`Step::Prepare`] transaction (redeem, redelegate and tokenize) and then send the
/// resulting share tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Prepare share tokens.
    Prepare,

    /// The final transaction.
    Send,
}

impl Step {
    /// One-based position of the step within a two-step operation.
    pub const fn ordinal(&self) -> u8 {
        match self {
            Self::Prepare => 1,
            Self::Send => 2,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prepare => f.write_str("prepare"),
            Self::Send => f.write_str("send"),
        }
    }
}

/// How the effect of a broadcast transaction is observed on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "probe", rename_all = "snake_case")]
pub enum ConfirmationProbe {
    /// A balance moves away from its pre-broadcast value.
    Balance {
        /// Chain to query.
        chain: ChainId,
        /// Account to query.
        address: Address,
        /// Denomination to query.
        denom: String,
        /// Expected direction of the change.
        direction: Direction,
    },

    /// New tokenize-share records show up for an account.
    ///
    /// The baseline is the highest record id the owner held before the broadcast. Redeeming a
    /// whole share balance deletes its record, so only ids above the baseline are counted.
    ShareRecords {
        /// Owner of the records.
        owner: Address,
        /// Number of records the transaction creates.
        expected: usize,
    },

    /// The given unstake records disappear.
    UnstakeCleared {
        /// Owner of the records.
        owner: Address,
        /// Pool the records belong to.
        pool_addr: Address,
        /// Indices being withdrawn.
        indices: Vec<UnstakeIndex>,
    },
}

/// What the final step still needs once the preparation step has landed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    /// Number of tokenize-shares messages in the preparation transaction.
    pub tokenize_count: usize,

    /// Shares that were already held as tokens and need no preparation.
    pub direct: Vec<LsmShare>,
}

/// Where a retry re-enters the operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "at", rename_all = "snake_case")]
pub enum ResumePoint {
    /// Nothing has been broadcast that must not be repeated; plan from scratch.
    #[default]
    Start,

    /// The preparation transaction was broadcast; only the final step remains.
    Send {
        /// Hash of the preparation transaction.
        prepare_tx: TxHash,

        /// Data carried over from the preparation plan.
        followup: FollowUp,

        /// Highest record id the sender held before the preparation was broadcast.
        #[serde(default)]
        records_after: RecordId,

        /// The share records selected for the final step, once known.
        ///
        /// Pinned so that a retry sends the same records again instead of picking up records
        /// created by an unrelated operation in the meantime.
        #[serde(default)]
        records: Option<Vec<TokenizedShareRecord>>,
    },
}

impl ResumePoint {
    /// The first step that still has to be planned.
    pub const fn next_step(&self) -> Option<Step> {
        match self {
            Self::Start => None,
            Self::Send { .. } => Some(Step::Send),
        }
    }
}

/// Exchange-rate quote attached to a plan.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// The amount being moved.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,

    /// What the user is expected to receive, if known.
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub will_receive: Option<Amount>,
}

/// A fully planned transaction, ready to be handed to the signing client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTx {
    /// Which step of the operation this transaction is.
    pub step: Step,

    /// Chain the transaction is submitted to.
    pub chain: ChainId,

    /// Signer of the transaction.
    pub sender: Address,

    /// The messages, in order.
    pub msgs: Vec<ChainMsg>,

    /// How to observe that the transaction took effect.
    pub probe: ConfirmationProbe,

    /// Required for [`Step::Prepare`]: what the final step needs afterwards.
    pub followup: Option<FollowUp>,

    /// Share records selected for a final step, pinned for retries.
    pub records: Option<Vec<TokenizedShareRecord>>,

    /// Amounts involved, when the planner can compute them.
    pub quote: Option<Quote>,
}
