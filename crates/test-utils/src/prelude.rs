//! Commonly used items, re-exported for convenient glob imports in tests.

pub use crate::{
    chain::{Effects, MockChain, Submission, SubmitOutcome},
    fixtures::*,
};
