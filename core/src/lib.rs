//! # JWT Auth Core
//!
//! Stateless access-token issuing and validation.
//! This crate contains the token claims, the HMAC signing key, the clock
//! abstraction, the token service and the error types it reports.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
