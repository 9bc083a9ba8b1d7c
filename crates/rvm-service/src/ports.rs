//! # Ports
//!
//! The narrow capabilities the services need from the outside world. The
//! SQLite [`Database`](rvm_db::Database) and the
//! [`InMemoryStore`](crate::memory::InMemoryStore) implement all of the store
//! traits; [`StaticIdentityProvider`](crate::identity::StaticIdentityProvider)
//! implements [`IdentityProvider`].
//!
//! Each method is one storage statement. None of them span a database
//! transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rvm_core::{ItemId, NewUser, TransactionId, User, UserId, UserProfile};
use rvm_db::DbResult;

use crate::error::IdentityError;

/// Transaction existence, transitions and aggregates.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn transaction_exists(&self, id: &TransactionId) -> DbResult<bool>;

    /// Persists an open transaction.
    async fn insert_transaction(&self, id: &TransactionId, created_at: DateTime<Utc>)
        -> DbResult<()>;

    /// Appends one deposit event.
    async fn insert_transaction_item(
        &self,
        id: &TransactionId,
        item_id: ItemId,
        created_at: DateTime<Utc>,
    ) -> DbResult<()>;

    async fn is_transaction_assigned(&self, id: &TransactionId) -> DbResult<bool>;

    /// Sets the user only if none is set yet. `false` means nothing changed.
    async fn assign_user(&self, id: &TransactionId, user_id: &UserId) -> DbResult<bool>;

    async fn transaction_item_count(&self, id: &TransactionId) -> DbResult<i64>;

    async fn transaction_points(&self, id: &TransactionId) -> DbResult<i64>;
}

/// Item catalog lookups.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn item_exists(&self, item_id: ItemId) -> DbResult<bool>;

    async fn item_points(&self, item_id: ItemId) -> DbResult<Option<i64>>;
}

/// Registered users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn user_exists(&self, user_id: &UserId) -> DbResult<bool>;

    async fn create_user(&self, user: &NewUser) -> DbResult<User>;
}

/// Derived point balances.
#[async_trait]
pub trait PointsStore: Send + Sync {
    /// Sum over every deposit in every transaction assigned to the user.
    async fn user_points(&self, user_id: &UserId) -> DbResult<i64>;
}

/// External identity verification.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves an opaque credential (e.g. an ID token) to a verified user id.
    async fn verify_identity(&self, credential: &str) -> Result<UserId, IdentityError>;

    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, IdentityError>;
}
