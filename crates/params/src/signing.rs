//! Recognition of user rejections reported by the signing client.

use serde::{Deserialize, Serialize};

use crate::default::REJECTION_MESSAGE;

/// Error codes and message fragments that identify a user declining to sign.
///
/// Wallets report rejections inconsistently, so both are matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningParams {
    /// Provider error codes meaning "rejected by user".
    #[serde(default)]
    pub rejection_codes: Vec<i64>,

    /// Case-insensitive message fragments meaning "rejected by user".
    #[serde(default = "default_messages")]
    pub rejection_messages: Vec<String>,
}

impl Default for SigningParams {
    fn default() -> Self {
        Self {
            rejection_codes: vec![4001],
            rejection_messages: default_messages(),
        }
    }
}

fn default_messages() -> Vec<String> {
    vec![REJECTION_MESSAGE.to_owned()]
}

impl SigningParams {
    /// Whether an error with the given code and message is a user rejection.
    pub fn is_rejection(&self, code: Option<i64>, message: &str) -> bool {
        if code.is_some_and(|code| self.rejection_codes.contains(&code)) {
            return true;
        }
        let message = message.to_lowercase();
        self.rejection_messages
            .iter()
            .any(|fragment| message.contains(&fragment.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_codes_and_fragments() {
        let signing = SigningParams::default();
        assert!(signing.is_rejection(Some(4001), "whatever"));
        assert!(signing.is_rejection(None, "Error: request rejected by user"));
        assert!(!signing.is_rejection(Some(5), "out of gas"));
    }
}
