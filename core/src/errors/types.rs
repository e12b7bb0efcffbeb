//! Token error types
//!
//! Every way a token can be refused maps onto one `TokenError` variant, so
//! callers that only need a yes/no answer can collapse them while logs keep
//! the cause.

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Unsupported token algorithm")]
    UnsupportedAlgorithm,

    #[error("Missing required claim: {claim}")]
    MissingClaim { claim: String },

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    /// Stable error code for logs and metrics
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::TokenExpired => "TOKEN_EXPIRED",
            TokenError::InvalidTokenFormat => "INVALID_TOKEN_FORMAT",
            TokenError::InvalidSignature => "INVALID_SIGNATURE",
            TokenError::UnsupportedAlgorithm => "UNSUPPORTED_ALGORITHM",
            TokenError::MissingClaim { .. } => "MISSING_CLAIM",
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
        }
    }
}

/// Convert a decoding failure from the JWT library into a token error
impl From<JwtError> for TokenError {
    fn from(err: JwtError) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::UnsupportedAlgorithm
            }
            ErrorKind::MissingRequiredClaim(claim) => TokenError::MissingClaim {
                claim: claim.clone(),
            },
            _ => TokenError::InvalidTokenFormat,
        }
    }
}
