//! Errors that can occur during matching.

use tagquery_core::InvalidTree;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// The tree cannot be traversed against its source text.
    #[error("invalid input tree: {0}")]
    InvalidInput(#[from] InvalidTree),
}
