//! Credential hashing and role-bearing access tokens.
//!
//! Two building blocks shared by the HTTP services:
//! - [`CredentialHasher`]: Argon2id PHC strings, cost fixed at startup
//! - [`JwtHandler`] and [`Claims`]: HMAC-signed tokens carrying `sub`,
//!   `user_id`, a service-defined role, `iat` and `exp`
//!
//! [`Authenticator`] bundles both. Tokens are never recorded server-side, so
//! one stays usable until its `exp` passes or the signing secret changes.
//!
//! ```
//! use auth::{Authenticator, Claims, CredentialHasher, JwtHandler};
//! use chrono::Duration;
//!
//! let authenticator = Authenticator::from_parts(
//!     CredentialHasher::with_cost(1024, 1, 1).unwrap(),
//!     JwtHandler::new(b"secret_key_at_least_32_bytes_long!"),
//! );
//!
//! let stored = authenticator.hash_credential("doctor123").unwrap();
//! assert!(authenticator.verify_credential("doctor123", &stored));
//!
//! let token = authenticator
//!     .issue("64b7f0c2", "doctor", "doctor", Duration::minutes(30))
//!     .unwrap();
//! let claims: Claims<String> = authenticator.verify(&token).unwrap();
//! assert_eq!(claims.role, "doctor");
//! ```

pub mod authenticator;
pub mod credential;
pub mod jwt;

pub use authenticator::Authenticator;
pub use credential::CredentialError;
pub use credential::CredentialHasher;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
