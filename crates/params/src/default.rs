//! Default values for the orchestrator parameters.

use std::time::Duration;

/// Default delay between two confirmation polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(3_000);

/// Default number of polls after which a submitted transaction is reported as unconfirmed.
pub const MAX_POLL_ATTEMPTS: u32 = 20;

/// Default number of notices retained by the ledger.
pub const NOTICE_CAPACITY: usize = 10;

/// Default relative timeout applied to IBC transfers.
pub const IBC_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Message fragment that wallets report when the user declines to sign.
pub const REJECTION_MESSAGE: &str = "Request rejected";

pub(crate) const fn ibc_timeout() -> Duration {
    IBC_TIMEOUT
}

pub(crate) const fn notice_capacity() -> usize {
    NOTICE_CAPACITY
}
