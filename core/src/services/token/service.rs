//! Main token service implementation

use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use tracing::{debug, info, warn};

use ja_shared::config::DEFAULT_JWT_SECRET;

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, DomainResult, TokenError};

use super::clock::{Clock, SystemClock};
use super::config::{TokenServiceConfig, MAX_TOKEN_LIFETIME, MIN_TOKEN_LIFETIME};
use super::key::SigningKey;

/// Service issuing and verifying stateless access tokens
///
/// Holds nothing but the signing key, the token lifetime and a clock, all
/// fixed at construction, so a single instance can be shared across threads.
#[derive(Clone)]
pub struct TokenService<C: Clock = SystemClock> {
    key: SigningKey,
    lifetime: std::time::Duration,
    token_lifetime: chrono::Duration,
    validation: Validation,
    clock: C,
}

impl<C: Clock> std::fmt::Debug for TokenService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("key", &self.key)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl TokenService<SystemClock> {
    /// Creates a new token service reading the system clock
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService` instance, or `DomainError::Configuration` if the
    /// secret or lifetime is unusable
    pub fn new(config: TokenServiceConfig) -> DomainResult<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> TokenService<C> {
    /// Creates a new token service with an explicit time source
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration
    /// * `clock` - Time source for issuing and expiry checks
    ///
    /// # Returns
    ///
    /// A new `TokenService` instance, or `DomainError::Configuration` if the
    /// secret or lifetime is unusable
    pub fn with_clock(config: TokenServiceConfig, clock: C) -> DomainResult<Self> {
        let key = SigningKey::from_secret(&config.secret)?;

        if config.lifetime < MIN_TOKEN_LIFETIME {
            return Err(DomainError::Configuration {
                message: format!(
                    "Access token lifetime must be at least {} ms, got {} ms",
                    MIN_TOKEN_LIFETIME.as_millis(),
                    config.lifetime.as_millis()
                ),
            });
        }

        if config.lifetime > MAX_TOKEN_LIFETIME {
            return Err(DomainError::Configuration {
                message: format!(
                    "Access token lifetime must be at most {} ms, got {} ms",
                    MAX_TOKEN_LIFETIME.as_millis(),
                    config.lifetime.as_millis()
                ),
            });
        }

        let token_lifetime =
            chrono::Duration::from_std(config.lifetime).map_err(|_| DomainError::Configuration {
                message: "Access token lifetime is out of range".to_string(),
            })?;

        if clock.now().checked_add_signed(token_lifetime).is_none() {
            return Err(DomainError::Configuration {
                message: "Access token expiry would overflow the representable time range".to_string(),
            });
        }

        if config.secret == DEFAULT_JWT_SECRET {
            warn!("Token service is using the default development secret");
        }

        let mut validation = Validation::new(key.algorithm());
        validation.algorithms = key.accepted_algorithms().to_vec();
        validation.set_required_spec_claims(&["sub", "exp"]);
        validation.leeway = 0;
        // Expiry is checked against the injected clock in `try_parse`
        validation.validate_exp = false;
        validation.validate_aud = false;

        info!(
            algorithm = ?key.algorithm(),
            lifetime_ms = u64::try_from(config.lifetime.as_millis()).unwrap_or(u64::MAX),
            "Token service initialized"
        );

        Ok(Self {
            key,
            lifetime: config.lifetime,
            token_lifetime,
            validation,
            clock,
        })
    }

    /// Issues a signed access token for a subject
    ///
    /// # Arguments
    ///
    /// * `subject` - The authenticated principal, e.g. a username
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Compact `header.payload.signature` token
    /// * `Err(DomainError::Validation)` - Subject is blank
    pub fn issue(&self, subject: &str) -> DomainResult<String> {
        if subject.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Token subject must not be empty".to_string(),
            });
        }

        let claims = Claims::new_access_token(subject, self.clock.now(), self.token_lifetime);
        let token = self.encode_jwt(&claims)?;

        debug!(iat = claims.iat, exp = claims.exp, "Issued access token");
        Ok(token)
    }

    /// Parses a token, checking its signature and expiry
    ///
    /// Signature is checked before any claim is looked at, so an expired
    /// result is only ever reported for an authentic token.
    ///
    /// # Arguments
    ///
    /// * `token` - The compact access token
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The verified claims
    /// * `Err(DomainError::Token)` - Token is malformed, forged, expired or
    ///   signed with an unaccepted algorithm
    pub fn try_parse(&self, token: &str) -> DomainResult<Claims> {
        let token_data = decode::<Claims>(token, self.key.decoding_key(), &self.validation)
            .map_err(TokenError::from)?;
        let claims = token_data.claims;

        if claims.sub.is_empty() {
            return Err(TokenError::MissingClaim {
                claim: "sub".to_string(),
            }
            .into());
        }

        if claims.is_expired_at(self.clock.now()) {
            return Err(TokenError::TokenExpired.into());
        }

        Ok(claims)
    }

    /// Checks whether a token is authentic and unexpired
    ///
    /// Never fails: every rejection cause collapses to `false`. The cause is
    /// logged at debug level.
    pub fn verify(&self, token: &str) -> bool {
        match self.try_parse(token) {
            Ok(_) => true,
            Err(err) => {
                let reason = err
                    .as_token_error()
                    .map(TokenError::error_code)
                    .unwrap_or("INVALID_TOKEN");
                debug!(reason, "Rejected access token");
                false
            }
        }
    }

    /// Returns the subject of a verified token
    ///
    /// # Arguments
    ///
    /// * `token` - The compact access token
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The subject claim
    /// * `Err(DomainError::Token)` - Same failures as `try_parse`
    pub fn subject_of(&self, token: &str) -> DomainResult<String> {
        self.try_parse(token).map(|claims| claims.sub)
    }

    /// Configured access token lifetime
    pub fn lifetime(&self) -> std::time::Duration {
        self.lifetime
    }

    /// Algorithm used when signing
    pub fn algorithm(&self) -> Algorithm {
        self.key.algorithm()
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        let header = Header::new(self.key.algorithm());
        encode(&header, claims, self.key.encoding_key())
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }
}
