use std::sync::Arc;

use auth::Authenticator;
use auth::Claims;
use auth::JwtError;

use crate::domain::access::errors::AccessError;
use crate::domain::access::models::Caller;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Role;

const BEARER_PREFIX: &str = "Bearer ";

/// Turns bearer tokens into callers and checks role membership.
#[derive(Clone)]
pub struct AccessGuard {
    authenticator: Arc<Authenticator>,
}

impl AccessGuard {
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Extract the token from an `Authorization` header value.
    ///
    /// Returns None when the value is not of the form `Bearer <token>`.
    pub fn bearer_token(header: &str) -> Option<&str> {
        header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Resolve the caller a token was issued to.
    ///
    /// # Arguments
    /// * `token` - Bearer token, if the request carried one
    ///
    /// # Returns
    /// Caller with identity id, username and role from the claims
    ///
    /// # Errors
    /// * `MissingToken` - No token supplied
    /// * `ExpiredToken` - Signature valid but past expiry
    /// * `InvalidToken` - Malformed, bad signature or unknown role
    pub fn identity_of(&self, token: Option<&str>) -> Result<Caller, AccessError> {
        let token = token.ok_or(AccessError::MissingToken)?;

        let claims: Claims<Role> = self.authenticator.verify(token).map_err(|e| match e {
            JwtError::TokenExpired => AccessError::ExpiredToken,
            other => AccessError::InvalidToken(other.to_string()),
        })?;

        if claims.user_id.is_empty() || claims.sub.is_empty() {
            return Err(AccessError::InvalidToken(
                "token is missing subject or user id".to_string(),
            ));
        }

        Ok(Caller {
            identity_id: IdentityId(claims.user_id),
            username: claims.sub,
            role: claims.role,
        })
    }

    /// Check that a role is one of the allowed roles.
    ///
    /// Exact membership only; no role implies another.
    ///
    /// # Errors
    /// * `Forbidden` - Role not in `allowed`
    pub fn authorize(&self, role: Role, allowed: &[Role]) -> Result<(), AccessError> {
        if allowed.contains(&role) {
            Ok(())
        } else {
            Err(AccessError::Forbidden { role })
        }
    }
}
