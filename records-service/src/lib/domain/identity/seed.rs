use auth::CredentialHasher;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::new_identity_document;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Role;
use crate::domain::identity::models::Username;
use crate::domain::store::models::Document;

/// Demonstration accounts available whenever the emulated store is active.
pub const DEMO_IDENTITIES: [(&str, &str, Role); 3] = [
    ("admin", "admin123", Role::Admin),
    ("doctor", "doctor123", Role::Doctor),
    ("nurse", "nurse123", Role::Nurse),
];

/// Build active identity documents for the demonstration accounts.
///
/// # Errors
/// * `Internal` - Hashing or serialization failed
pub fn demo_identities(hasher: &CredentialHasher) -> Result<Vec<Document>, IdentityError> {
    let now = Utc::now();

    DEMO_IDENTITIES
        .iter()
        .map(|(username, password, role)| {
            let password_hash = hasher
                .hash(password)
                .map_err(|e| IdentityError::Internal(format!("Password hashing failed: {}", e)))?;

            new_identity_document(
                &Username::new(username.to_string())?,
                &EmailAddress::new(format!("{}@meditrack.com", username))?,
                password_hash,
                *role,
                Some(demo_profile(username)),
                now,
            )
        })
        .collect()
}

fn demo_profile(username: &str) -> Document {
    let mut first_name = username.to_string();
    if let Some(initial) = first_name.get_mut(0..1) {
        initial.make_ascii_uppercase();
    }

    match json!({"firstName": first_name, "lastName": "Demo", "phone": "555-0100"}) {
        Value::Object(profile) => profile,
        _ => Document::new(),
    }
}
