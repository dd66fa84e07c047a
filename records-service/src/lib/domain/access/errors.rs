use thiserror::Error;

use crate::domain::identity::models::Role;

/// Error for authentication and authorization of a request
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Insufficient permissions for role '{role}'")]
    Forbidden { role: Role },
}

impl AccessError {
    /// True for every failure that means "who are you?" rather than "not allowed".
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, AccessError::Forbidden { .. })
    }
}
