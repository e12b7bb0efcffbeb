//! HMAC signing key derivation for JWT operations

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::errors::DomainError;

/// Minimum key length for the weakest accepted HMAC variant (HS256)
pub const MIN_HMAC_KEY_BYTES: usize = 32;

const HS384_KEY_BYTES: usize = 48;
const HS512_KEY_BYTES: usize = 64;

/// Symmetric key used to sign and verify access tokens
///
/// The signing algorithm is the strongest HMAC variant the key is long enough
/// for. Verification accepts every HMAC variant the key is long enough for, so
/// tokens from peers sharing the secret but signing with a weaker variant
/// still verify.
#[derive(Clone)]
pub struct SigningKey {
    /// Key for signing JWTs
    encoding_key: EncodingKey,
    /// Key for verifying JWTs
    decoding_key: DecodingKey,
    /// Algorithm used when signing
    algorithm: Algorithm,
    /// Algorithms accepted when verifying
    accepted_algorithms: Vec<Algorithm>,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .field("accepted_algorithms", &self.accepted_algorithms)
            .field("key", &"[hidden]")
            .finish()
    }
}

impl SigningKey {
    /// Derives a signing key from the UTF-8 bytes of a secret
    ///
    /// # Arguments
    ///
    /// * `secret` - Raw key material
    ///
    /// # Returns
    ///
    /// * `Ok(SigningKey)` - Key derived successfully
    /// * `Err(DomainError::Configuration)` - Secret shorter than 32 bytes
    pub fn from_secret(secret: &str) -> Result<Self, DomainError> {
        let bytes = secret.as_bytes();

        let algorithm = strongest_algorithm(bytes.len()).ok_or_else(|| DomainError::Configuration {
            message: format!(
                "JWT secret is {} bytes; HMAC-SHA signing requires at least {} bytes",
                bytes.len(),
                MIN_HMAC_KEY_BYTES
            ),
        })?;

        let accepted_algorithms = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512]
            .into_iter()
            .filter(|alg| bytes.len() >= min_key_bytes(*alg))
            .collect();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            algorithm,
            accepted_algorithms,
        })
    }

    /// Algorithm used when signing
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Algorithms accepted when verifying
    pub fn accepted_algorithms(&self) -> &[Algorithm] {
        &self.accepted_algorithms
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

fn strongest_algorithm(key_len: usize) -> Option<Algorithm> {
    match key_len {
        len if len >= HS512_KEY_BYTES => Some(Algorithm::HS512),
        len if len >= HS384_KEY_BYTES => Some(Algorithm::HS384),
        len if len >= MIN_HMAC_KEY_BYTES => Some(Algorithm::HS256),
        _ => None,
    }
}

fn min_key_bytes(algorithm: Algorithm) -> usize {
    match algorithm {
        Algorithm::HS512 => HS512_KEY_BYTES,
        Algorithm::HS384 => HS384_KEY_BYTES,
        _ => MIN_HMAC_KEY_BYTES,
    }
}
