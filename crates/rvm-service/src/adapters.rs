//! Store traits over the SQLite [`Database`] handle.
//!
//! Thin delegation to the repositories; all SQL lives in `rvm-db`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rvm_core::{ItemId, NewUser, TransactionId, User, UserId};
use rvm_db::{Database, DbResult};

use crate::ports::{Catalog, PointsStore, TransactionStore, UserStore};

#[async_trait]
impl TransactionStore for Database {
    async fn transaction_exists(&self, id: &TransactionId) -> DbResult<bool> {
        self.transactions().exists(id).await
    }

    async fn insert_transaction(
        &self,
        id: &TransactionId,
        created_at: DateTime<Utc>,
    ) -> DbResult<()> {
        self.transactions().create(id, created_at).await.map(|_| ())
    }

    async fn insert_transaction_item(
        &self,
        id: &TransactionId,
        item_id: ItemId,
        created_at: DateTime<Utc>,
    ) -> DbResult<()> {
        self.transactions()
            .add_item(id, item_id, created_at)
            .await
            .map(|_| ())
    }

    async fn is_transaction_assigned(&self, id: &TransactionId) -> DbResult<bool> {
        self.transactions().is_assigned(id).await
    }

    async fn assign_user(&self, id: &TransactionId, user_id: &UserId) -> DbResult<bool> {
        self.transactions().assign_user(id, user_id).await
    }

    async fn transaction_item_count(&self, id: &TransactionId) -> DbResult<i64> {
        self.transactions().item_count(id).await
    }

    async fn transaction_points(&self, id: &TransactionId) -> DbResult<i64> {
        self.transactions().points(id).await
    }
}

#[async_trait]
impl Catalog for Database {
    async fn item_exists(&self, item_id: ItemId) -> DbResult<bool> {
        self.items().exists(item_id).await
    }

    async fn item_points(&self, item_id: ItemId) -> DbResult<Option<i64>> {
        self.items().points(item_id).await
    }
}

#[async_trait]
impl UserStore for Database {
    async fn user_exists(&self, user_id: &UserId) -> DbResult<bool> {
        self.users().exists(user_id).await
    }

    async fn create_user(&self, user: &NewUser) -> DbResult<User> {
        self.users().create(user).await
    }
}

#[async_trait]
impl PointsStore for Database {
    async fn user_points(&self, user_id: &UserId) -> DbResult<i64> {
        self.users().points(user_id).await
    }
}
