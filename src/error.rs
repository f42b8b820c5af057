//! Crate-level error type.

use thiserror::Error;

use crate::solver::IntegrationError;

/// Errors produced while configuring, running or exporting relaxation runs.
#[derive(Debug, Error)]
pub enum RelaxError {
    /// A parameter, grid or table violates a precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The integrator rejected its inputs or failed mid-run.
    #[error("integration failed: {0}")]
    Integration(#[from] IntegrationError),

    /// Filesystem failure while exporting.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two columns that must line up have different lengths.
    #[error("{context} length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Which column was checked.
        context: &'static str,
        /// Length of the reference column.
        expected: usize,
        /// Length actually found.
        got: usize,
    },
}

/// Shorthand result type.
pub type RelaxResult<T> = Result<T, RelaxError>;

impl RelaxError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        RelaxError::InvalidArgument(message.into())
    }
}
