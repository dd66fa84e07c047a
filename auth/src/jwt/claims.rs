use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Role-bearing JWT claims.
///
/// Generic over the role type so each service can use its own closed role set.
/// `sub` carries the login handle, `user_id` the store identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims<R> {
    /// Subject (username)
    pub sub: String,

    /// Identity identifier in the backing store
    pub user_id: String,

    /// Role granted to the subject
    pub role: R,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl<R> Claims<R> {
    /// Create claims that expire `ttl` from now.
    ///
    /// # Arguments
    /// * `user_id` - Unique identity identifier
    /// * `username` - Login handle (stored in `sub`)
    /// * `role` - Role claim
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with sub, user_id, role, iat and exp set
    pub fn issue(user_id: impl ToString, username: impl ToString, role: R, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            sub: username.to_string(),
            user_id: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }
}
