//! Errors for the orchestrator parameters.

use thiserror::Error;

/// Error while loading or validating parameters.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// The parameter file could not be read.
    #[error("could not read {path}: {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The parameter file is not valid TOML for [`Params`](crate::Params).
    #[error("malformed params: {0}")]
    Malformed(#[from] toml::de::Error),

    /// The parameters are well-formed but inconsistent.
    #[error("invalid params: {0}")]
    Invalid(String),
}
