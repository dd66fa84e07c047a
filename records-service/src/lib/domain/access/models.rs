use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Role;

/// Authenticated principal extracted from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub identity_id: IdentityId,
    pub username: String,
    pub role: Role,
}
