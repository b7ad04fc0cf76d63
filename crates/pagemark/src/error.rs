use crate::executor::ExecutorError;
use pagemark_core::{
    error::{ConfigurationError, InvalidCursorError, UnknownSortError},
    sort::ValidationError,
};
use thiserror::Error as ThisError;

///
/// PaginateError
///
/// Umbrella error for one pagination call. Callers map Configuration to an
/// internal-error response and InvalidCursor/UnknownSort to a client-error
/// response; Executor failures surface the backend's own error unchanged.
///

#[derive(Debug, ThisError)]
pub enum PaginateError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    InvalidCursor(#[from] InvalidCursorError),

    #[error(transparent)]
    UnknownSort(#[from] UnknownSortError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl From<ValidationError> for PaginateError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Configuration(err) => Self::Configuration(err),
            ValidationError::Cursor(err) => Self::InvalidCursor(err),
        }
    }
}
