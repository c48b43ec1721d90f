//! Centralized error handling.
//!
//! Every precondition failure in the lending and reservation logic is
//! surfaced as a typed variant; nothing is silently skipped. The embedding
//! application decides how to present these to a user.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    // Lending
    #[error("No copies available for lending")]
    OutOfStock,

    #[error("An open borrow record already exists for this book and user")]
    AlreadyBorrowed,

    #[error("The borrow record is already returned")]
    AlreadyReturned,

    // Seat reservation
    #[error("The seat is not available for reservation")]
    NotAvailable,

    #[error("Invalid state transition: {0}")]
    InvalidTransition(&'static str),

    // Accounts
    #[error("Invalid credentials")]
    InvalidCredentials,

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
