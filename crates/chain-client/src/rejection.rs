//! Classification of signing failures.

use lsd_params::signing::SigningParams;

use crate::errors::ClientError;

/// Why a submission did not produce a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    /// The user declined to sign.
    UserRejected,

    /// The transaction was not broadcast, or the chain refused it.
    Broadcast {
        /// Provider or chain error code, if any.
        code: Option<i64>,
        /// Reason reported by the provider or chain.
        detail: String,
    },
}

/// Classifies an error returned by [`SigningClient::submit`](crate::SigningClient::submit).
pub fn classify(err: &ClientError, signing: &SigningParams) -> SubmitFailure {
    match err {
        ClientError::Provider { code, message } if signing.is_rejection(*code, message) => {
            SubmitFailure::UserRejected
        }
        ClientError::Provider { code, message } => SubmitFailure::Broadcast {
            code: *code,
            detail: message.clone(),
        },
        other => SubmitFailure::Broadcast {
            code: None,
            detail: other.to_string(),
        },
    }
}
