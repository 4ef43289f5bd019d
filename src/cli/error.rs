//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        Self::Application(ApplicationError::from(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => exitcode::USAGE,
            CliError::Io { .. } => exitcode::IOERR,
            CliError::Application(e) => match e {
                ApplicationError::Domain(_) => exitcode::DATAERR,
                ApplicationError::UnsupportedFormat { .. } => exitcode::DATAERR,
                ApplicationError::OperationFailed { .. } => exitcode::IOERR,
            },
        }
    }
}
