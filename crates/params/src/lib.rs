//! This crate contains the static parameters that dictate how the orchestrator talks to the source
//! chain, the hub and the bridge targets, along with the polling and signing policies it applies.

pub mod bridge;
pub mod chains;
pub mod default;
pub mod errors;
pub mod poll;
pub mod signing;

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    bridge::BridgeParams,
    chains::{HubParams, SourceChainParams},
    errors::ParamsError,
    poll::PollParams,
    signing::SigningParams,
};

/// All parameters needed to plan, submit and confirm operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Maximum number of notices retained by the ledger.
    #[serde(default = "default::notice_capacity")]
    pub notice_capacity: usize,

    /// The chain users stake from.
    pub source: SourceChainParams,

    /// The hub chain hosting the stake manager and the derivative token.
    pub hub: HubParams,

    /// Bridge routes for the derivative token.
    #[serde(default)]
    pub bridge: BridgeParams,

    /// Confirmation polling policy.
    #[serde(default)]
    pub poll: PollParams,

    /// Signals used to recognize a user declining to sign.
    #[serde(default)]
    pub signing: SigningParams,

    /// Relative timeout applied to every IBC transfer.
    #[serde(default = "default::ibc_timeout")]
    pub ibc_timeout: Duration,
}

impl Params {
    /// Parses parameters from a TOML string and validates them.
    pub fn from_toml_str(s: &str) -> Result<Self, ParamsError> {
        let params: Self = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    /// Reads parameters from a TOML file and validates them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ParamsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Checks internal consistency of the parameters.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.poll.max_attempts == 0 {
            return Err(ParamsError::Invalid("poll.max_attempts must be positive".into()));
        }
        if self.notice_capacity == 0 {
            return Err(ParamsError::Invalid("notice_capacity must be positive".into()));
        }
        if self.source.chain_id == self.hub.chain_id {
            return Err(ParamsError::Invalid(
                "source and hub chains must differ".into(),
            ));
        }
        self.bridge.validate()
    }
}
