use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::credential::CredentialError;
use crate::credential::CredentialHasher;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Credential hashing plus token issuance behind one shared value.
///
/// Services hold it in an `Arc`; both halves are immutable after startup.
pub struct Authenticator {
    hasher: CredentialHasher,
    tokens: JwtHandler,
}

impl Authenticator {
    /// Default Argon2 cost and HS256 tokens.
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self::from_parts(CredentialHasher::default(), JwtHandler::new(jwt_secret))
    }

    /// Build from a configured hasher and token handler.
    pub fn from_parts(hasher: CredentialHasher, tokens: JwtHandler) -> Self {
        Self { hasher, tokens }
    }

    pub fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    pub fn hash_credential(&self, secret: &str) -> Result<String, CredentialError> {
        self.hasher.hash(secret)
    }

    pub fn verify_credential(&self, secret: &str, stored: &str) -> bool {
        self.hasher.verify(secret, stored)
    }

    /// Sign a role-bearing token for an identity.
    ///
    /// # Arguments
    /// * `user_id` - Store identifier of the identity
    /// * `username` - Login handle, carried as `sub`
    /// * `role` - Role claim
    /// * `ttl` - Lifetime from now
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn issue<R: Serialize>(
        &self,
        user_id: impl ToString,
        username: impl ToString,
        role: R,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        self.tokens
            .encode(&Claims::issue(user_id, username, role, ttl))
    }

    /// Decode a token into its claims after checking signature and expiry.
    ///
    /// A role that does not deserialize into `R` makes the token invalid.
    ///
    /// # Errors
    /// * `TokenExpired` - Signature valid but past `exp`
    /// * `InvalidToken` - Anything else
    pub fn verify<R: DeserializeOwned>(&self, token: &str) -> Result<Claims<R>, JwtError> {
        self.tokens.decode(token)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Role {
        Doctor,
        Nurse,
    }

    fn authenticator() -> Authenticator {
        Authenticator::from_parts(
            CredentialHasher::with_cost(1024, 1, 1).expect("Failed to build hasher"),
            JwtHandler::new(b"test_secret_key_at_least_32_bytes!"),
        )
    }

    #[test]
    fn test_credential_round_trip() {
        let authenticator = authenticator();
        let stored = authenticator
            .hash_credential("doctor123")
            .expect("Failed to hash secret");

        assert!(authenticator.verify_credential("doctor123", &stored));
        assert!(!authenticator.verify_credential("nurse123", &stored));
    }

    #[test]
    fn test_issue_then_verify_typed_role() {
        let authenticator = authenticator();

        let token = authenticator
            .issue("7", "nurse_joy", Role::Nurse, Duration::minutes(30))
            .expect("Failed to issue token");
        let claims: Claims<Role> = authenticator.verify(&token).expect("Failed to verify");

        assert_eq!(claims.user_id, "7");
        assert_eq!(claims.sub, "nurse_joy");
        assert_eq!(claims.role, Role::Nurse);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_unknown_role_is_invalid() {
        let authenticator = authenticator();

        let token = authenticator
            .issue("7", "root", "superuser", Duration::minutes(30))
            .expect("Failed to issue token");

        assert!(matches!(
            authenticator.verify::<Role>(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_elapsed_ttl_is_expired() {
        let authenticator = authenticator();

        let token = authenticator
            .issue("7", "dr_house", Role::Doctor, Duration::seconds(-10))
            .expect("Failed to issue token");

        assert_eq!(
            authenticator.verify::<Role>(&token).err(),
            Some(JwtError::TokenExpired)
        );
    }

    #[test]
    fn test_foreign_secret_is_invalid() {
        let token = Authenticator::new(b"another_secret_at_least_32_bytes_long")
            .issue("7", "dr_house", Role::Doctor, Duration::minutes(5))
            .expect("Failed to issue token");

        assert!(matches!(
            authenticator().verify::<Role>(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }
}
