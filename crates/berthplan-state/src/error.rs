//! Error types for the berthplan store.

use thiserror::Error;

/// Result type alias for store operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StateError {
    /// Opening the database, a table or a transaction, or committing it.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    /// A stored record could not be encoded to or decoded from JSON.
    #[error("record encoding error: {0}")]
    Codec(String),

    /// A write would break a uniqueness or reference rule; nothing was committed.
    #[error("constraint violation: {0}")]
    Constraint(String),
}
