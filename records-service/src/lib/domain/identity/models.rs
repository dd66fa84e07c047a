use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::domain::identity::errors::EmailError;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::errors::PasswordPolicyError;
use crate::domain::identity::errors::RoleError;
use crate::domain::identity::errors::UsernameError;
use crate::domain::store::models::Document;

/// Collection holding identity documents.
pub const USERS_COLLECTION: &str = "users";

/// Registered principal able to log in.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: IdentityId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub profile: Option<Document>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Store-assigned identifier of an identity document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityId(pub String);

impl IdentityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Access role carried in token claims.
///
/// Closed set with no ordering between roles: an admin is granted access
/// only where `Admin` is listed explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Nurse,
    Patient,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Doctor, Role::Nurse, Role::Patient];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
            Role::Patient => "patient",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| RoleError::Unknown(s.to_string()))
    }
}

/// Username value type
///
/// Ensures username is 3-50 characters and contains only alphanumeric,
/// underscore, hyphen and dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 50;

    /// Create a new valid username.
    ///
    /// # Arguments
    /// * `username` - Raw username string
    ///
    /// # Returns
    /// Validated Username value object
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 50 characters
    /// * `InvalidCharacters` - Contains characters other than alphanumerics, `_`, `-` and `.`
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(UsernameError::InvalidCharacters);
        }

        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plain-text secret supplied at registration.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(..)")
    }
}

/// Command to register a new identity with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: Password,
    pub role: Role,
    pub profile: Option<Document>,
}

/// Successful login: signed token plus the identity it was issued for.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: String,
    pub expires_in: i64,
    pub identity: Identity,
}

/// Stored shape of an identity document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    username: String,
    email: String,
    #[serde(rename = "password_hash")]
    password_hash: String,
    role: Role,
    #[serde(default)]
    profile: Option<Document>,
    #[serde(default = "active_by_default")]
    is_active: bool,
    #[serde(default)]
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn active_by_default() -> bool {
    true
}

/// Build the document for a new identity; the store assigns `_id`.
///
/// # Errors
/// * `Internal` - Record could not be serialized
pub fn new_identity_document(
    username: &Username,
    email: &EmailAddress,
    password_hash: String,
    role: Role,
    profile: Option<Document>,
    now: DateTime<Utc>,
) -> Result<Document, IdentityError> {
    let record = IdentityRecord {
        id: None,
        username: username.as_str().to_string(),
        email: email.as_str().to_string(),
        password_hash,
        role,
        profile,
        is_active: true,
        last_login: None,
        created_at: now,
        updated_at: now,
    };

    match serde_json::to_value(record) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(IdentityError::Internal(format!(
            "identity serialized to non-object: {}",
            other
        ))),
        Err(e) => Err(IdentityError::Internal(e.to_string())),
    }
}

impl TryFrom<Document> for Identity {
    type Error = IdentityError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        let record: IdentityRecord = serde_json::from_value(Value::Object(document))
            .map_err(|e| IdentityError::Internal(format!("malformed identity document: {}", e)))?;

        let id = record
            .id
            .ok_or_else(|| IdentityError::Internal("identity document without _id".to_string()))?;

        Ok(Identity {
            id: IdentityId(id),
            username: Username::new(record.username)?,
            email: EmailAddress::new(record.email)?,
            password_hash: record.password_hash,
            role: record.role,
            profile: record.profile,
            is_active: record.is_active,
            last_login: record.last_login,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}
