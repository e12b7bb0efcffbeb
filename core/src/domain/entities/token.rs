//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Claims structure for JWT payload
///
/// Timestamps are JWT NumericDates: whole seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the authenticated principal)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an access token
    ///
    /// # Arguments
    ///
    /// * `subject` - The principal the token is issued to
    /// * `now` - Issuance instant
    /// * `lifetime` - How long the token stays valid
    ///
    /// # Returns
    ///
    /// A new `Claims` instance whose `exp` is `now + lifetime`, both truncated
    /// to whole seconds. An expiry past the representable range saturates.
    pub fn new_access_token(subject: impl Into<String>, now: DateTime<Utc>, lifetime: Duration) -> Self {
        let expiry = now.checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        }
    }

    /// Checks if the claims have expired at the given instant
    ///
    /// A token stays valid strictly before its expiration second.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.exp.saturating_mul(1000)
    }

    /// Gets the subject from the claims
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Issuance instant, if the timestamp is representable
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    /// Expiration instant, if the timestamp is representable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}
