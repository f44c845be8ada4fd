use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    /// Rejected before any search starts.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A solver broke one of its own invariants.
    #[error("internal error: {0}")]
    Internal(String),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SolverError {
    pub(crate) fn invalid(message: impl Into<String>) -> SolverError {
        SolverError::InvalidInput(message.into())
    }
    pub(crate) fn internal(message: impl Into<String>) -> SolverError {
        SolverError::Internal(message.into())
    }
}

pub type Result<T, E = SolverError> = std::result::Result<T, E>;
