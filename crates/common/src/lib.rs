//! Utilities shared by the orchestrator binaries.

pub mod logging;
