//! Custom error types for the screens.

use thiserror::Error;
use trainmate_client::TrainmateError;

/// Screen action errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(#[from] TrainmateError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Read-only: {0}")]
    ReadOnly(String),

    #[error("Not signed in")]
    Unauthenticated,
}

impl AppError {
    /// Log a failed remote call and wrap it. Callers leave their local state
    /// untouched after this.
    pub fn remote(action: &'static str, err: TrainmateError) -> Self {
        tracing::error!(action, kind = err.kind(), error = %err, "remote call failed");
        AppError::Api(err)
    }

    /// Turn a local field check into a validation error without logging it as
    /// a remote failure.
    pub fn invalid(err: TrainmateError) -> Self {
        match err {
            TrainmateError::InvalidInput(msg) => AppError::Validation(msg),
            other => AppError::Api(other),
        }
    }
}

/// Result type alias for screen actions.
pub type AppResult<T> = Result<T, AppError>;
