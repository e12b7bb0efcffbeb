//! Access-token signing configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Secret used when nothing else is configured. Refused in production.
pub const DEFAULT_JWT_SECRET: &str = "development-secret-please-change-in-production";

/// Default access-token lifetime: one hour
pub const DEFAULT_ACCESS_TOKEN_EXPIRATION_MILLIS: u64 = 3_600_000;

/// Upper bound on the access-token lifetime: 100 years of 365 days
pub const MAX_ACCESS_TOKEN_EXPIRATION_MILLIS: u64 = 3_153_600_000_000;

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct JwtConfig {
    /// Raw HMAC key material, UTF-8 encoded before use. The byte-length
    /// minimum is enforced when the signing key is derived.
    #[validate(length(min = 1, message = "secret must not be empty"))]
    pub secret: String,

    /// Access token lifetime in milliseconds
    #[serde(alias = "access-token-expiration", default = "default_access_token_expiration")]
    #[validate(range(
        min = 1000,
        max = 3_153_600_000_000u64,
        message = "access token expiration must be between 1000 ms and 100 years"
    ))]
    pub access_token_expiration: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            access_token_expiration: DEFAULT_ACCESS_TOKEN_EXPIRATION_MILLIS,
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in milliseconds
    pub fn with_access_expiration_millis(mut self, millis: u64) -> Self {
        self.access_token_expiration = millis;
        self
    }

    /// Access token lifetime as a duration
    pub fn access_token_lifetime(&self) -> Duration {
        Duration::from_millis(self.access_token_expiration)
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

fn default_access_token_expiration() -> u64 {
    DEFAULT_ACCESS_TOKEN_EXPIRATION_MILLIS
}
