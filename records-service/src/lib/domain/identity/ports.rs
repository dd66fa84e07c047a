use async_trait::async_trait;

use crate::domain::access::models::Caller;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LoginOutcome;
use crate::domain::identity::models::RegisterCommand;

/// Port for identity domain service operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Verify credentials and issue an access token.
    ///
    /// # Arguments
    /// * `handle` - Username or email address
    /// * `secret` - Plain text password
    ///
    /// # Returns
    /// Signed token, its lifetime in seconds and the matching identity
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown handle or wrong password
    /// * `InactiveAccount` - Password matched but the account is disabled
    /// * `Store` - Store operation failed
    async fn login(&self, handle: &str, secret: &str) -> Result<LoginOutcome, IdentityError>;

    /// Create a new identity.
    ///
    /// # Arguments
    /// * `command` - Validated registration data
    ///
    /// # Returns
    /// Stored identity
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Username or email already registered
    /// * `Store` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Identity, IdentityError>;

    /// Load the identity a token was issued for.
    ///
    /// # Errors
    /// * `NotFound` - No identity with the caller's username
    /// * `Store` - Store operation failed
    async fn current(&self, caller: &Caller) -> Result<Identity, IdentityError>;
}
