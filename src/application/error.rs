//! Application-level errors (wraps domain errors)

use std::io;

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add session and dump concerns.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("tree handle is no longer valid (session destroyed)")]
    NullTree,

    #[error("dump failed: {context}")]
    Dump {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// Create a dump error with context.
    pub fn dump(context: impl Into<String>, source: io::Error) -> Self {
        Self::Dump {
            context: context.into(),
            source,
        }
    }

    /// Numeric status code of the C-style tree API (0 is success).
    ///
    /// 4 is the catch-all for I/O failures, so config errors share it with
    /// dump errors; the CLI tells them apart through its exit codes.
    pub fn code(&self) -> u8 {
        match self {
            ApplicationError::Domain(DomainError::MemoryError { .. }) => 1,
            ApplicationError::Domain(DomainError::InvalidCapacity { .. }) => 2,
            ApplicationError::NullTree => 3,
            ApplicationError::Dump { .. } | ApplicationError::Config { .. } => 4,
            ApplicationError::Domain(DomainError::Overflow { .. }) => 5,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
