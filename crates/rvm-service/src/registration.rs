//! # User Registration
//!
//! ```text
//! credential ──► verify_identity ──► user_exists? ──► fetch_profile ──► create_user
//!                     │                   │                 │
//!                     ▼                   ▼                 ▼
//!              InvalidCredential   UserAlreadyExists  ProfileUnavailable
//! ```

use std::sync::Arc;

use rvm_core::{validation, CoreError, NewUser, User};
use rvm_db::DbError;
use tracing::{info, instrument, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::ports::{IdentityProvider, UserStore};

const OP: &str = "register";

/// Creates user rows for identities the provider vouches for.
#[derive(Debug)]
pub struct RegistrationService<S, P> {
    store: Arc<S>,
    identity: P,
}

impl<S, P> RegistrationService<S, P>
where
    S: UserStore,
    P: IdentityProvider,
{
    pub fn new(store: Arc<S>, identity: P) -> Self {
        RegistrationService { store, identity }
    }

    /// Registers the user behind `credential`.
    #[instrument(skip_all)]
    pub async fn register(&self, credential: &str) -> ServiceResult<User> {
        let user_id = self
            .identity
            .verify_identity(credential)
            .await
            .map_err(|source| {
                warn!(error = %source, "Credential rejected");
                ServiceError::InvalidCredential { source }
            })?;

        if self
            .store
            .user_exists(&user_id)
            .await
            .map_err(ServiceError::storage(OP))?
        {
            return Err(ServiceError::rejected(
                OP,
                CoreError::UserAlreadyExists(user_id.to_string()),
            ));
        }

        let profile = self
            .identity
            .fetch_profile(&user_id)
            .await
            .map_err(|source| ServiceError::ProfileUnavailable {
                user_id: user_id.to_string(),
                source,
            })?;

        validation::validate_email(&profile.email)
            .map_err(|e| ServiceError::rejected(OP, e.into()))?;

        let new_user = NewUser {
            user_id,
            full_name: profile.display_name,
            email: profile.email,
        };

        let user = match self.store.create_user(&new_user).await {
            Ok(user) => user,
            // Registered concurrently between the check and the insert
            Err(DbError::UniqueViolation { .. }) => {
                return Err(ServiceError::rejected(
                    OP,
                    CoreError::UserAlreadyExists(new_user.user_id.to_string()),
                ));
            }
            Err(e) => return Err(ServiceError::storage(OP)(e)),
        };

        info!(user_id = %user.user_id, "User registered");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticIdentityProvider;
    use crate::memory::InMemoryStore;
    use rvm_core::{ErrorKind, UserId, UserProfile};

    fn provider() -> StaticIdentityProvider {
        StaticIdentityProvider::new()
            .with_identity(
                "token-alice",
                UserId::parse("alice").unwrap(),
                UserProfile {
                    display_name: "Alice Example".into(),
                    email: "alice@example.com".into(),
                },
            )
            .with_credential_only("token-bob", UserId::parse("bob").unwrap())
            .with_identity(
                "token-carol",
                UserId::parse("carol").unwrap(),
                UserProfile {
                    display_name: "Carol".into(),
                    email: "not-an-email".into(),
                },
            )
    }

    #[tokio::test]
    async fn test_register_creates_user_from_profile() {
        let store = Arc::new(InMemoryStore::new());
        let service = RegistrationService::new(store.clone(), provider());

        let user = service.register("token-alice").await.unwrap();

        assert_eq!(user.user_id.as_str(), "alice");
        assert_eq!(user.full_name, "Alice Example");
        assert!(store.user_exists(&user.user_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_register_twice_is_conflict() {
        let service = RegistrationService::new(Arc::new(InMemoryStore::new()), provider());
        service.register("token-alice").await.unwrap();

        let err = service.register("token-alice").await.unwrap_err();
        assert!(matches!(err.domain(), Some(CoreError::UserAlreadyExists(_))));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_register_rejected_credential() {
        let service = RegistrationService::new(Arc::new(InMemoryStore::new()), provider());

        let err = service.register("forged").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredential { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_register_profile_unavailable() {
        let store = Arc::new(InMemoryStore::new());
        let service = RegistrationService::new(store.clone(), provider());

        let err = service.register("token-bob").await.unwrap_err();
        assert!(matches!(err, ServiceError::ProfileUnavailable { .. }));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!store
            .user_exists(&UserId::parse("bob").unwrap())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_register_invalid_email_rejected() {
        let service = RegistrationService::new(Arc::new(InMemoryStore::new()), provider());

        let err = service.register("token-carol").await.unwrap_err();
        assert!(matches!(err.domain(), Some(CoreError::Validation(_))));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
