//! Errors reported by chain clients.

use thiserror::Error;

/// Errors that can occur while querying a chain or submitting a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The signing provider or the node returned an error.
    ///
    /// User rejections surface through this variant; see [`crate::rejection`].
    #[error("provider error (code {code:?}): {message}")]
    Provider {
        /// Provider specific error code, if any.
        code: Option<i64>,
        /// Human readable message.
        message: String,
    },

    /// The request did not reach the chain.
    #[error("transport: {0}")]
    Transport(String),

    /// The queried entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The response could not be decoded.
    #[error("decode: {0}")]
    Decode(String),
}

impl ClientError {
    /// Creates a [`ClientError::Provider`] error.
    pub fn provider(code: Option<i64>, message: impl Into<String>) -> Self {
        Self::Provider {
            code,
            message: message.into(),
        }
    }
}

/// Result alias for chain client calls.
pub type ClientResult<T> = Result<T, ClientError>;
