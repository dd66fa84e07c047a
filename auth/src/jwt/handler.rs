use std::str::FromStr;

use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type to allow services to define their own token payload.
/// Only HMAC algorithms are supported since the key is a shared secret.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Returns
    /// JwtHandler instance configured with HS256 algorithm
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    /// - Rotating the secret invalidates every outstanding token at once
    pub fn new(secret: &[u8]) -> Self {
        Self::build(secret, Algorithm::HS256)
    }

    /// Create a JWT handler for a named HMAC algorithm.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `algorithm` - Algorithm identifier: `HS256`, `HS384` or `HS512`
    ///
    /// # Returns
    /// JwtHandler instance configured with the requested algorithm
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Identifier is unknown or not an HMAC algorithm
    pub fn with_algorithm(secret: &[u8], algorithm: &str) -> Result<Self, JwtError> {
        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| JwtError::UnsupportedAlgorithm(algorithm.to_string()))?;

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                Ok(Self::build(secret, algorithm))
            }
            other => Err(JwtError::UnsupportedAlgorithm(format!("{:?}", other))),
        }
    }

    fn build(secret: &[u8], algorithm: Algorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
        }
    }

    /// Encode claims into a JWT token.
    ///
    /// # Arguments
    /// * `claims` - Claims to encode (must implement Serialize)
    ///
    /// # Returns
    /// Compact JWT string (`header.claims.signature`, URL-safe base64)
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// The header algorithm must match the configured one, the signature must
    /// verify and `exp` must be present and not in the past (no leeway).
    ///
    /// # Arguments
    /// * `token` - JWT token string to decode
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `TokenExpired` - Token is well-formed and signed but past its expiry
    /// * `InvalidToken` - Token signature is invalid, token is malformed or claims are missing
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<T>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}
