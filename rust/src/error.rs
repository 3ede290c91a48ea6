//! Error handling and result types for tree operations.
//!
//! `Conflict` and `NotFound` are the two expected outcomes a caller has to
//! handle. `CorruptedTree` is only ever produced by the validators; a broken
//! invariant found in the middle of a mutation panics instead.

use thiserror::Error;

/// Error type for ordered-map operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Insert of a key that is already present.
    #[error("Key already present in tree")]
    Conflict,
    /// Search, get or delete of a key that is not present.
    #[error("Key not found in tree")]
    NotFound,
    /// Shape or ordering invariant violated.
    #[error("Corrupted tree: {0}")]
    CorruptedTree(String),
}

impl TreeError {
    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Check if this error is a duplicate-key rejection
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict)
    }

    /// Check if this error is a missing-key report
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Result type for key lookup operations
pub type KeyResult<T> = Result<T, TreeError>;

/// Result type for tree modification operations
pub type ModifyResult<T> = Result<T, TreeError>;
