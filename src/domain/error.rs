//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the request/index model.
/// These are independent of I/O and format concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unsupported request shape: {0} (expected string, array, or object)")]
    UnsupportedType(String),

    #[error("index shape does not match request: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    #[error("leaf offset {offset} out of range for {len} loaded values")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("invalid pack level {level}, must be below {max}")]
    InvalidPackLevel { level: usize, max: usize },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
