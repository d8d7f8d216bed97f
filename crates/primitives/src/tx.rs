//! Results returned by the signing client.

use serde::{Deserialize, Serialize};

use crate::types::TxHash;

/// Outcome of a broadcast transaction as reported by the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    /// Hash of the broadcast transaction.
    pub hash: TxHash,

    /// Result code; `0` means the transaction was accepted.
    pub code: u32,

    /// Raw log emitted by the chain, carrying the failure reason when `code != 0`.
    #[serde(default)]
    pub raw_log: String,
}

impl TxResponse {
    /// Whether the chain accepted the transaction.
    pub const fn is_success(&self) -> bool {
        self.code == 0
    }
}
