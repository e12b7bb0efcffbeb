//! Domain-specific error types and error handling.

mod types;


// Re-export all error types and utilities
pub use types::TokenError;

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// The token error carried by this error, if any
    pub fn as_token_error(&self) -> Option<&TokenError> {
        match self {
            DomainError::Token(err) => Some(err),
            _ => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
