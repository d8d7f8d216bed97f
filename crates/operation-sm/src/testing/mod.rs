//! Testing utilities for the Operation State Machine.

pub(crate) mod fixtures;
pub(crate) mod transition;
