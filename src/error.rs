//! Error types for the index and its bucket trees.

use thiserror::Error;

/// Result type alias using [`IndexError`].
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors surfaced by [`HashIndex`](crate::HashIndex).
///
/// Lookups never fail: a missing key is reported through `bool`/`Option`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("bucket capacity must be at least 1")]
    ZeroCapacity,

    #[error("bucket {bucket} is corrupted: {violation}")]
    Corrupted {
        bucket: usize,
        violation: InvariantViolation,
    },
}

/// A broken structural invariant found by `validate()`.
///
/// `path` is the route from the root to the offending node, one `L` or `R`
/// per step; the root itself has an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("keys out of order at node `{path}`")]
    Ordering { path: String },

    #[error("cached height {cached} at node `{path}` should be {actual}")]
    StaleHeight {
        path: String,
        cached: usize,
        actual: usize,
    },

    #[error("balance factor {balance} at node `{path}` is outside [-1, 1]")]
    Unbalanced { path: String, balance: isize },
}
