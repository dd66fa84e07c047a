use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Duration;
use chrono::SecondsFormat;
use chrono::Utc;

use crate::domain::access::models::Caller;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::new_identity_document;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::LoginOutcome;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::USERS_COLLECTION;
use crate::domain::identity::ports::IdentityServicePort;
use crate::domain::store::errors::StoreError;
use crate::domain::store::handle::Collection;
use crate::domain::store::handle::StoreHandle;
use crate::domain::store::models::Changes;
use crate::domain::store::models::Filter;

/// Secret behind the hash that unknown handles are verified against.
const DECOY_SECRET: &str = "decoy-credential-never-issued";

/// Domain service for login, registration and identity lookup.
pub struct IdentityService {
    store: StoreHandle,
    authenticator: Arc<Authenticator>,
    token_ttl: Duration,
    decoy_hash: OnceLock<String>,
}

impl IdentityService {
    /// Create a new identity service.
    ///
    /// # Arguments
    /// * `store` - Active document store
    /// * `authenticator` - Password hasher and token signer
    /// * `token_ttl` - Lifetime of issued access tokens
    pub fn new(store: StoreHandle, authenticator: Arc<Authenticator>, token_ttl: Duration) -> Self {
        Self {
            store,
            authenticator,
            token_ttl,
            decoy_hash: OnceLock::new(),
        }
    }

    fn users(&self) -> Collection {
        self.store.collection(USERS_COLLECTION)
    }

    /// Run one full verification for a handle that matched nothing, so an
    /// unknown handle costs as much as a wrong secret.
    fn verify_against_decoy(&self, secret: &str) {
        let decoy = self.decoy_hash.get_or_init(|| {
            self.authenticator
                .hash_credential(DECOY_SECRET)
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Failed to hash decoy credential");
                    String::new()
                })
        });

        let _ = self.authenticator.verify_credential(secret, decoy);
    }
}

fn username_or_email(handle: &str) -> Filter {
    Filter::or([Filter::eq("username", handle), Filter::eq("email", handle)])
}

#[async_trait]
impl IdentityServicePort for IdentityService {
    async fn login(&self, handle: &str, secret: &str) -> Result<LoginOutcome, IdentityError> {
        let users = self.users();

        let Some(document) = users.find_one(username_or_email(handle)).await? else {
            self.verify_against_decoy(secret);
            tracing::info!(handle, reason = "unknown_handle", "Login rejected");
            return Err(IdentityError::InvalidCredentials);
        };
        let mut identity = Identity::try_from(document)?;

        if !self
            .authenticator
            .verify_credential(secret, &identity.password_hash)
        {
            tracing::info!(handle, reason = "wrong_password", "Login rejected");
            return Err(IdentityError::InvalidCredentials);
        }

        if !identity.is_active {
            tracing::info!(handle, reason = "inactive", "Login rejected");
            return Err(IdentityError::InactiveAccount);
        }

        let access_token = self
            .authenticator
            .issue(
                identity.id.as_str(),
                identity.username.as_str(),
                identity.role,
                self.token_ttl,
            )
            .map_err(|e| IdentityError::Internal(format!("Token signing failed: {}", e)))?;

        let now = Utc::now();
        users
            .update_one(
                Filter::by_id(identity.id.as_str()),
                Changes::new().set("lastLogin", now.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            )
            .await?;
        identity.last_login = Some(now);

        tracing::info!(
            identity_id = %identity.id,
            username = %identity.username,
            role = %identity.role,
            "Login succeeded"
        );

        Ok(LoginOutcome {
            access_token,
            expires_in: self.token_ttl.num_seconds(),
            identity,
        })
    }

    async fn register(&self, command: RegisterCommand) -> Result<Identity, IdentityError> {
        let users = self.users();

        let existing = users
            .find_one(Filter::or([
                Filter::eq("username", command.username.as_str()),
                Filter::eq("email", command.email.as_str()),
            ]))
            .await?;
        if existing.is_some() {
            return Err(IdentityError::DuplicateIdentity);
        }

        let password_hash = self
            .authenticator
            .hash_credential(command.password.as_str())
            .map_err(|e| IdentityError::Internal(format!("Password hashing failed: {}", e)))?;

        let document = new_identity_document(
            &command.username,
            &command.email,
            password_hash,
            command.role,
            command.profile,
            Utc::now(),
        )?;

        let id = users.insert_one(document).await.map_err(|e| match e {
            StoreError::DuplicateKey { .. } => IdentityError::DuplicateIdentity,
            other => IdentityError::Store(other),
        })?;

        let created = users
            .find_one(Filter::by_id(id.as_str()))
            .await?
            .ok_or_else(|| {
                IdentityError::Internal(format!("identity {} vanished after insert", id))
            })?;
        let identity = Identity::try_from(created)?;

        tracing::info!(
            identity_id = %identity.id,
            username = %identity.username,
            role = %identity.role,
            "Identity registered"
        );

        Ok(identity)
    }

    async fn current(&self, caller: &Caller) -> Result<Identity, IdentityError> {
        let document = self
            .users()
            .find_one(Filter::eq("username", caller.username.as_str()))
            .await?
            .ok_or_else(|| IdentityError::NotFound(caller.username.clone()))?;

        Identity::try_from(document)
    }
}

#[cfg(test)]
mod tests {
    use auth::CredentialHasher;
    use auth::JwtHandler;
    use mockall::mock;

    use super::*;
    use crate::domain::access::guard::AccessGuard;
    use crate::domain::identity::models::EmailAddress;
    use crate::domain::identity::models::IdentityId;
    use crate::domain::identity::models::Password;
    use crate::domain::identity::models::Role;
    use crate::domain::identity::models::Username;
    use crate::domain::identity::seed::demo_identities;
    use crate::domain::store::models::BackendKind;
    use crate::domain::store::models::Document;
    use crate::domain::store::ports::DocumentStore;
    use crate::outbound::store::emulated::EmulatedDocumentStore;

    const SECRET: &[u8] = b"identity_test_secret_at_least_32_bytes";

    mock! {
        pub TestDocumentStore {}

        #[async_trait]
        impl DocumentStore for TestDocumentStore {
            fn kind(&self) -> BackendKind;
            async fn ping(&self) -> Result<(), StoreError>;
            async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, StoreError>;
            async fn find(&self, collection: &str, filter: &Filter, skip: usize, limit: Option<usize>) -> Result<Vec<Document>, StoreError>;
            async fn insert_one(&self, collection: &str, document: Document) -> Result<String, StoreError>;
            async fn update_one(&self, collection: &str, filter: &Filter, changes: &Changes) -> Result<u64, StoreError>;
            async fn close(&self);
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::from_parts(
            CredentialHasher::with_cost(1024, 1, 1).unwrap(),
            JwtHandler::new(SECRET),
        ))
    }

    fn seeded_service() -> (IdentityService, EmulatedDocumentStore, Arc<Authenticator>) {
        let authenticator = authenticator();
        let users = demo_identities(authenticator.hasher()).unwrap();
        let backend =
            EmulatedDocumentStore::seeded([(USERS_COLLECTION.to_string(), users)]).unwrap();
        let service = IdentityService::new(
            StoreHandle::new(Arc::new(backend.clone())),
            Arc::clone(&authenticator),
            Duration::minutes(30),
        );
        (service, backend, authenticator)
    }

    fn register_command(username: &str, email: &str, role: Role) -> RegisterCommand {
        RegisterCommand {
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password: Password::new("securepass".to_string()).unwrap(),
            role,
            profile: None,
        }
    }

    #[tokio::test]
    async fn test_login_demo_identity() {
        let (service, _, authenticator) = seeded_service();

        let outcome = service.login("doctor", "doctor123").await.unwrap();

        assert_eq!(outcome.identity.username.as_str(), "doctor");
        assert_eq!(outcome.expires_in, 30 * 60);
        assert!(outcome.identity.last_login.is_some());

        let caller = AccessGuard::new(authenticator)
            .identity_of(Some(&outcome.access_token))
            .unwrap();
        assert_eq!(caller.role, Role::Doctor);
        assert_eq!(caller.identity_id, outcome.identity.id);
    }

    #[tokio::test]
    async fn test_login_by_email() {
        let (service, _, _) = seeded_service();

        let outcome = service.login("nurse@meditrack.com", "nurse123").await.unwrap();
        assert_eq!(outcome.identity.role, Role::Nurse);
    }

    #[tokio::test]
    async fn test_login_records_last_login() {
        let (service, backend, _) = seeded_service();

        service.login("admin", "admin123").await.unwrap();

        let stored = backend
            .find_one(USERS_COLLECTION, &Filter::eq("username", "admin"))
            .await
            .unwrap()
            .unwrap();
        assert!(stored["lastLogin"].is_string());
    }

    #[tokio::test]
    async fn test_login_wrong_secret_and_unknown_handle_look_alike() {
        let (service, _, _) = seeded_service();

        let wrong_secret = service.login("doctor", "wrong").await.unwrap_err();
        let unknown = service.login("ghost", "doctor123").await.unwrap_err();

        assert!(matches!(wrong_secret, IdentityError::InvalidCredentials));
        assert!(matches!(unknown, IdentityError::InvalidCredentials));
        assert_eq!(wrong_secret.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_unknown_handle_still_runs_a_verification() {
        let (service, _, authenticator) = seeded_service();

        service.login("doctor", "wrong").await.unwrap_err();
        assert!(service.decoy_hash.get().is_none());

        let result = service.login("ghost", DECOY_SECRET).await;
        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));

        let decoy = service.decoy_hash.get().expect("decoy hash was not built");
        assert!(decoy.starts_with("$argon2id$"));
        assert!(decoy.contains("m=1024,t=1,p=1"));
        assert!(authenticator.verify_credential(DECOY_SECRET, decoy));

        // Built once, reused afterwards
        service.login("phantom", "anything").await.unwrap_err();
        assert_eq!(service.decoy_hash.get(), Some(decoy));
    }

    #[tokio::test]
    async fn test_login_inactive_account() {
        let (service, backend, _) = seeded_service();
        backend
            .update_one(
                USERS_COLLECTION,
                &Filter::eq("username", "nurse"),
                &Changes::new().set("isActive", false),
            )
            .await
            .unwrap();

        let result = service.login("nurse", "nurse123").await;
        assert!(matches!(result, Err(IdentityError::InactiveAccount)));

        let result = service.login("nurse", "wrong").await;
        assert!(matches!(result, Err(IdentityError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (service, _, authenticator) = seeded_service();

        let identity = service
            .register(register_command("drsmith", "drsmith@meditrack.com", Role::Doctor))
            .await
            .unwrap();
        assert_eq!(identity.username.as_str(), "drsmith");
        assert!(identity.is_active);
        assert!(identity.password_hash.starts_with("$argon2id$"));

        let outcome = service.login("drsmith", "securepass").await.unwrap();
        let caller = AccessGuard::new(authenticator)
            .identity_of(Some(&outcome.access_token))
            .unwrap();

        assert_eq!(caller.role, Role::Doctor);
        assert_eq!(caller.identity_id, identity.id);
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let (service, _, _) = seeded_service();

        let result = service
            .register(register_command("doctor", "other@meditrack.com", Role::Doctor))
            .await;
        assert!(matches!(result, Err(IdentityError::DuplicateIdentity)));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (service, backend, _) = seeded_service();

        let result = service
            .register(register_command("newnurse", "nurse@meditrack.com", Role::Nurse))
            .await;
        assert!(matches!(result, Err(IdentityError::DuplicateIdentity)));
        assert_eq!(backend.count(USERS_COLLECTION).await, 3);
    }

    #[tokio::test]
    async fn test_current_identity() {
        let (service, _, _) = seeded_service();
        let outcome = service.login("admin", "admin123").await.unwrap();

        let caller = Caller {
            identity_id: outcome.identity.id.clone(),
            username: "admin".to_string(),
            role: Role::Admin,
        };
        let identity = service.current(&caller).await.unwrap();

        assert_eq!(identity.id, outcome.identity.id);
        assert_eq!(identity.email.as_str(), "admin@meditrack.com");
    }

    #[tokio::test]
    async fn test_current_identity_not_found() {
        let (service, _, _) = seeded_service();
        let caller = Caller {
            identity_id: IdentityId("missing".to_string()),
            username: "ghost".to_string(),
            role: Role::Patient,
        };

        let result = service.current(&caller).await;
        assert!(matches!(result, Err(IdentityError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_login_store_failure() {
        let mut store = MockTestDocumentStore::new();
        store
            .expect_find_one()
            .times(1)
            .returning(|_, _| Err(StoreError::Backend("connection reset".to_string())));

        let service = IdentityService::new(
            StoreHandle::new(Arc::new(store)),
            authenticator(),
            Duration::minutes(30),
        );

        let result = service.login("doctor", "doctor123").await;
        assert!(matches!(result, Err(IdentityError::Store(StoreError::Backend(_)))));
    }

    #[tokio::test]
    async fn test_register_insert_failure_is_not_retried() {
        let mut store = MockTestDocumentStore::new();
        store.expect_find_one().times(1).returning(|_, _| Ok(None));
        store
            .expect_insert_one()
            .withf(|collection, document| {
                collection == USERS_COLLECTION
                    && document["username"] == "drsmith"
                    && document["password_hash"]
                        .as_str()
                        .map_or(false, |hash| hash.starts_with("$argon2id$"))
            })
            .times(1)
            .returning(|_, _| Err(StoreError::Backend("disk full".to_string())));

        let service = IdentityService::new(
            StoreHandle::new(Arc::new(store)),
            authenticator(),
            Duration::minutes(30),
        );

        let result = service
            .register(register_command("drsmith", "drsmith@meditrack.com", Role::Doctor))
            .await;
        assert!(matches!(result, Err(IdentityError::Store(StoreError::Backend(_)))));
    }
}
