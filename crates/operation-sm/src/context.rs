//! Data that persists across every state of an operation.

use lsd_primitives::{
    msgs::ChainMsg,
    types::{Amount, OpId},
};

use crate::{
    operation::TxHashes,
    plan::{Quote, ResumePoint, Step},
    request::OperationRequest,
};

/// Context carried by an operation for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    pub(crate) op_id: OpId,
    pub(crate) request: OperationRequest,
    pub(crate) resume: ResumePoint,
    pub(crate) tx_hashes: TxHashes,
    pub(crate) pending_msgs: Vec<ChainMsg>,
    pub(crate) quote: Option<Quote>,
    pub(crate) two_step: bool,
    /// Set once a transaction reached the chain. Before that the operation leaves no trace in the
    /// notice ledger.
    pub(crate) notice_opened: bool,
}

impl OperationContext {
    /// Creates the context of a fresh operation.
    pub const fn new(op_id: OpId, request: OperationRequest) -> Self {
        Self {
            op_id,
            request,
            resume: ResumePoint::Start,
            tx_hashes: TxHashes {
                prepare: None,
                send: None,
            },
            pending_msgs: Vec::new(),
            quote: None,
            two_step: false,
            notice_opened: false,
        }
    }

    /// The operation id.
    pub const fn op_id(&self) -> OpId {
        self.op_id
    }

    /// The original request.
    pub const fn request(&self) -> &OperationRequest {
        &self.request
    }

    /// Where a retry re-enters.
    pub const fn resume(&self) -> &ResumePoint {
        &self.resume
    }

    /// Hashes of broadcast transactions.
    pub const fn tx_hashes(&self) -> &TxHashes {
        &self.tx_hashes
    }

    /// The amount moved by the operation, preferring the planned quote.
    pub fn amount(&self) -> Amount {
        self.quote
            .map(|quote| quote.amount)
            .unwrap_or_else(|| self.request.requested_amount())
    }

    /// What the user is expected to receive.
    pub fn will_receive(&self) -> Option<Amount> {
        self.quote.and_then(|quote| quote.will_receive)
    }

    /// The steps of the operation as known so far.
    pub fn steps(&self) -> Vec<Step> {
        if self.two_step {
            vec![Step::Prepare, Step::Send]
        } else {
            vec![Step::Send]
        }
    }
}
