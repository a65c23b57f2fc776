use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("An unexpected error has occurred at {caller}: {}", e.into());
    Err(AppError::Unexpected)
}

/// Logs a storage failure and hands it back to the caller untouched.
#[track_caller]
pub fn storage<T>(e: sqlx::Error) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("A storage error has occurred at {caller}: {e}");
    Err(AppError::Storage(e))
}

#[derive(Debug)]
pub enum AppError {
    Unexpected,
    Storage(sqlx::Error),

    ConversationsNotFound,

    FiltersInvalidValue(&'static str),
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    #[track_caller]
    fn from(e: E) -> Self {
        unexpected::<(), E>(e).unwrap_err()
    }
}

impl AppError {
    pub const fn as_str(&self) -> &str {
        self.code()
    }

    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected => "unexpected",
            AppError::Storage(_) => "storage",

            AppError::ConversationsNotFound => "conversations.not_found",

            AppError::FiltersInvalidValue(_) => "filters.invalid_value",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            AppError::Unexpected => "An unexpected error has occurred.",
            AppError::Storage(_) => "The storage backend failed to complete the request.",

            AppError::ConversationsNotFound => "Conversation not found.",

            AppError::FiltersInvalidValue(_) => "A filter was given an invalid value.",
        }
    }

    pub fn response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code(),
            message: self.message(),
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Storage(e) => write!(f, "{}: {e}", self.message()),
            AppError::FiltersInvalidValue(key) => write!(f, "{} ({key})", self.message()),
            _ => f.write_str(self.message()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: &'static str,
}
