//! Configuration for the token service

use std::time::Duration;

use ja_shared::JwtConfig;

/// Shortest accepted access token lifetime. `exp` has whole-second
/// precision, so anything shorter could expire at the moment of issue.
pub const MIN_TOKEN_LIFETIME: Duration = Duration::from_secs(1);

/// Longest accepted access token lifetime: 100 years of 365 days.
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Configuration for the token service
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub secret: String,
    /// Access token lifetime
    pub lifetime: Duration,
}

impl TokenServiceConfig {
    pub fn new(secret: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            secret: secret.into(),
            lifetime,
        }
    }
}

impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("secret", &"[hidden]")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self::new(config.secret.clone(), config.access_token_lifetime())
    }
}
