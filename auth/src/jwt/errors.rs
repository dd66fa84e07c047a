use thiserror::Error;

/// Error type for JWT operations.
///
/// `TokenExpired` is only reported for tokens whose signature checked out;
/// everything else that makes a token unusable is `InvalidToken`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
}
