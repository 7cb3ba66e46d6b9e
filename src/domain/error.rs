//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors raised by the arena and the tree itself.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid capacity: {capacity} (must be at least 1)")]
    InvalidCapacity { capacity: usize },

    #[error("cannot allocate node storage for capacity {capacity}")]
    MemoryError { capacity: usize },

    #[error(
        "binary tree overflow: all {capacity} nodes in use, \
         create the tree with more capacity"
    )]
    Overflow { capacity: usize },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
