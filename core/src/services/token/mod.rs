//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - HMAC signing key derivation from the configured secret
//! - Access token issuing
//! - Signature and expiry verification
//! - Time source abstraction for deterministic expiry

mod clock;
mod config;
mod key;
mod service;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{TokenServiceConfig, MAX_TOKEN_LIFETIME, MIN_TOKEN_LIFETIME};
pub use key::{SigningKey, MIN_HMAC_KEY_BYTES};
pub use service::TokenService;
