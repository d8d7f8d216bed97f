//! Confirmation polling policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::default::{MAX_POLL_ATTEMPTS, POLL_INTERVAL};

/// How often and how long to poll for the side effect of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollParams {
    /// Delay before every poll.
    pub interval: Duration,

    /// Polls allowed before the transaction is reported as unconfirmed.
    pub max_attempts: u32,
}

impl Default for PollParams {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}
