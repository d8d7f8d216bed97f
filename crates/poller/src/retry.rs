use std::{fmt::Display, future::Future};

use lsd_params::poll::PollParams;
use tracing::{debug, trace, warn};

/// What a judge concluded from one fetched value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The expected effect has not happened yet.
    Pending,

    /// The expected effect happened.
    Confirmed,

    /// The chain reports that the effect will never happen.
    Failed(String),
}

/// Final result of a polling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The judge confirmed the value fetched in attempt `attempts`.
    Confirmed {
        /// The confirming value.
        value: T,
        /// Number of fetches performed.
        attempts: u32,
    },

    /// The judge rejected the value fetched in attempt `attempts`.
    Failed {
        /// Reason given by the judge.
        reason: String,
        /// Number of fetches performed.
        attempts: u32,
    },

    /// The budget ran out without a verdict.
    ///
    /// The effect may still happen later; this is not a failure of the transaction.
    TimedOut {
        /// Number of fetches performed.
        attempts: u32,
        /// The last successfully fetched value, if any.
        last: Option<T>,
    },
}

impl<T> PollOutcome<T> {
    /// Number of fetches performed.
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Confirmed { attempts, .. }
            | Self::Failed { attempts, .. }
            | Self::TimedOut { attempts, .. } => *attempts,
        }
    }

    /// Whether the expected effect was observed.
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// Fetches a value every `params.interval` until `judge` reaches a verdict.
///
/// Every attempt sleeps first, then fetches. Fetch errors count as pending attempts. The run
/// returns [`PollOutcome::TimedOut`] once attempt `params.max_attempts + 1` has been judged
/// pending.
pub async fn poll_until<T, E, F, Fut, J>(
    params: &PollParams,
    mut fetch: F,
    mut judge: J,
) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    J: FnMut(&T) -> Verdict,
{
    let mut last = None;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        tokio::time::sleep(params.interval).await;

        match fetch().await {
            Ok(value) => match judge(&value) {
                Verdict::Confirmed => {
                    debug!(%attempt, "poll confirmed");
                    return PollOutcome::Confirmed {
                        value,
                        attempts: attempt,
                    };
                }
                Verdict::Failed(reason) => {
                    debug!(%attempt, %reason, "poll failed");
                    return PollOutcome::Failed {
                        reason,
                        attempts: attempt,
                    };
                }
                Verdict::Pending => {
                    trace!(%attempt, "poll pending");
                    last = Some(value);
                }
            },
            Err(err) => warn!(%attempt, %err, "poll fetch failed"),
        }

        if attempt > params.max_attempts {
            debug!(%attempt, "poll budget exhausted");
            return PollOutcome::TimedOut {
                attempts: attempt,
                last,
            };
        }
    }
}
