use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::CredentialError;

/// One-way hasher for login secrets.
///
/// Produces Argon2id PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`)
/// with a fresh random salt per call. The cost only applies to new hashes:
/// verification reads the parameters back out of the stored string.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl CredentialHasher {
    /// Hasher with an explicit Argon2 cost.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Passes over memory
    /// * `parallelism` - Lanes
    ///
    /// # Errors
    /// * `InvalidCost` - Rejected by Argon2 (e.g. less than 8 KiB per lane)
    pub fn with_cost(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, CredentialError> {
        Params::new(memory_kib, iterations, parallelism, None)
            .map(|params| Self { params })
            .map_err(|e| CredentialError::InvalidCost(e.to_string()))
    }

    fn engine(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a secret for storage.
    pub fn hash(&self, secret: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .engine()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| CredentialError::HashingFailed(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check a secret against a stored PHC string.
    ///
    /// Malformed or empty hashes never match.
    pub fn verify(&self, secret: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };

        self.engine()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> CredentialHasher {
        CredentialHasher::with_cost(1024, 1, 1).expect("Failed to build hasher")
    }

    #[test]
    fn test_default_cost_round_trip() {
        let hasher = CredentialHasher::default();
        let stored = hasher.hash("doctor123").expect("Failed to hash secret");

        assert!(hasher.verify("doctor123", &stored));
        assert!(!hasher.verify("doctor124", &stored));
    }

    #[test]
    fn test_hash_is_phc_argon2id() {
        let stored = cheap().hash("admin123").expect("Failed to hash secret");

        assert!(stored.starts_with("$argon2id$v=19$"));
        assert!(stored.contains("m=1024,t=1,p=1"));
        assert!(!stored.contains("admin123"));
    }

    #[test]
    fn test_same_secret_hashes_differently() {
        let hasher = cheap();

        let first = hasher.hash("nurse123").expect("Failed to hash secret");
        let second = hasher.hash("nurse123").expect("Failed to hash secret");

        assert_ne!(first, second);
        assert!(hasher.verify("nurse123", &first));
        assert!(hasher.verify("nurse123", &second));
    }

    #[test]
    fn test_cost_change_keeps_old_hashes_valid() {
        let stored = cheap().hash("admin123").expect("Failed to hash secret");

        let stronger = CredentialHasher::with_cost(4096, 2, 1).expect("Failed to build hasher");
        assert!(stronger.verify("admin123", &stored));
    }

    #[test]
    fn test_unreadable_hash_never_matches() {
        let hasher = cheap();

        assert!(!hasher.verify("admin123", ""));
        assert!(!hasher.verify("admin123", "admin123"));
        assert!(!hasher.verify("", "$argon2id$v=19$garbage"));
    }

    #[test]
    fn test_empty_secret_is_hashable() {
        let hasher = cheap();
        let stored = hasher.hash("").expect("Failed to hash secret");

        assert!(hasher.verify("", &stored));
        assert!(!hasher.verify(" ", &stored));
    }

    #[test]
    fn test_invalid_cost() {
        assert!(matches!(
            CredentialHasher::with_cost(1, 1, 1),
            Err(CredentialError::InvalidCost(_))
        ));
    }
}
