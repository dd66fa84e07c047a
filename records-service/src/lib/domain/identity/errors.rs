use thiserror::Error;

use crate::domain::store::errors::StoreError;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, hyphen and dot allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters")]
    TooShort { min: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Top-level error for identity operations
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    // Value object validation errors
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    // Domain-level errors
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Inactive user")]
    InactiveAccount,

    #[error("Username or email already registered")]
    DuplicateIdentity,

    #[error("User not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}
