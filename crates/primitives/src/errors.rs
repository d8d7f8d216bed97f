//! Parsing errors for the primitive types.

use thiserror::Error;

/// Errors that can occur while parsing primitive values from their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The decimal string is malformed.
    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),

    /// The decimal has more fractional digits than supported.
    #[error("decimal {0} exceeds 18 fractional digits")]
    TooPrecise(String),

    /// The value does not fit in the target representation.
    #[error("decimal {0} overflows")]
    Overflow(String),

    /// The operation id is not a valid 16-byte hex string.
    #[error("invalid operation id: {0}")]
    InvalidOpId(String),

    /// Unknown operation kind.
    #[error("unknown operation kind: {0}")]
    UnknownKind(String),
}
