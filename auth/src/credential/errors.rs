use thiserror::Error;

/// Error type for credential hashing.
///
/// Verification has no error case: a stored hash that cannot be read simply
/// does not match.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Credential hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid Argon2 cost parameters: {0}")]
    InvalidCost(String),
}
