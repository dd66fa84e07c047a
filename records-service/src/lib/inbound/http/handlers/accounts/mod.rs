use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::Role;
use crate::domain::store::models::Document;

pub mod login;
pub mod logout;
pub mod me;
pub mod register;

pub use login::login;
pub use logout::logout;
pub use me::me;
pub use register::register;

/// Public view of an identity; never includes the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub profile: Option<Document>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Identity> for IdentityData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            username: identity.username.as_str().to_string(),
            email: identity.email.as_str().to_string(),
            role: identity.role,
            profile: identity.profile.clone(),
            is_active: identity.is_active,
            last_login: identity.last_login,
            created_at: identity.created_at,
        }
    }
}
