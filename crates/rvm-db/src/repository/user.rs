//! # User Repository
//!
//! Registered users and their derived point balances.
//!
//! ## Point Balance
//! ```text
//! users ──LEFT JOIN── transactions ──LEFT JOIN── transaction_items ──LEFT JOIN── items
//!   │                                                                            │
//!   └───────────────────── COALESCE(SUM(items.points), 0) ◄──────────────────────┘
//! ```
//! Outer joins all the way down: a user with no transactions, or transactions
//! with no deposits, sums to 0 instead of producing no row.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use rvm_core::{NewUser, User, UserId};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Checks whether a user is registered.
    pub async fn exists(&self, user_id: &UserId) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE user_id = ?1")
            .bind(user_id.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Gets a user by ID.
    pub async fn get(&self, user_id: &UserId) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, full_name, email, created_at
            FROM users
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Registers a user.
    ///
    /// ## Errors
    /// `UniqueViolation` if the user id is taken.
    pub async fn create(&self, new_user: &NewUser) -> DbResult<User> {
        debug!(user_id = %new_user.user_id, "Creating user");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (user_id, full_name, email, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(new_user.user_id.as_str())
        .bind(&new_user.full_name)
        .bind(&new_user.email)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            user_id: new_user.user_id.clone(),
            full_name: new_user.full_name.clone(),
            email: new_user.email.clone(),
            created_at: now,
        })
    }

    /// Total points over every deposit in every transaction assigned to the user.
    ///
    /// 0 for unknown users as well.
    pub async fn points(&self, user_id: &UserId) -> DbResult<i64> {
        let points: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(items.points), 0)
            FROM users
            LEFT JOIN transactions
                ON transactions.user_id = users.user_id
            LEFT JOIN transaction_items
                ON transaction_items.transaction_id = transactions.transaction_id
            LEFT JOIN items
                ON items.item_id = transaction_items.item_id
            WHERE users.user_id = ?1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_utils::{seed_item, seed_user, setup_test_db, tx_id};
    use crate::DbError;

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup_test_db().await;
        let alice = seed_user(&db, "alice").await;

        assert!(db.users().exists(&alice).await.unwrap());
        let user = db.users().get(&alice).await.unwrap().unwrap();
        assert_eq!(user.email, "alice@example.com");

        let nobody = UserId::parse("nobody").unwrap();
        assert!(!db.users().exists(&nobody).await.unwrap());
        assert!(db.users().get(&nobody).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_user_rejected() {
        let db = setup_test_db().await;
        seed_user(&db, "alice").await;

        let err = db
            .users()
            .create(&NewUser {
                user_id: UserId::parse("alice").unwrap(),
                full_name: "Alice Again".to_string(),
                email: "alice2@example.com".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_points_zero_without_activity() {
        let db = setup_test_db().await;
        let alice = seed_user(&db, "alice").await;

        assert_eq!(db.users().points(&alice).await.unwrap(), 0);
        assert_eq!(
            db.users()
                .points(&UserId::parse("ghost").unwrap())
                .await
                .unwrap(),
            0
        );

        // Assigned but empty transaction
        let id = tx_id("tx-000000000001");
        db.transactions().create(&id, Utc::now()).await.unwrap();
        db.transactions().assign_user(&id, &alice).await.unwrap();
        assert_eq!(db.users().points(&alice).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_points_sum_assigned_transactions_only() {
        let db = setup_test_db().await;
        let alice = seed_user(&db, "alice").await;
        let bob = seed_user(&db, "bob").await;
        let can = seed_item(&db, 7, 10).await;
        let bottle = seed_item(&db, 8, 4).await;
        let txs = db.transactions();

        let t1 = tx_id("tx-000000000001");
        let t2 = tx_id("tx-000000000002");
        let t3 = tx_id("tx-000000000003");
        let open = tx_id("tx-000000000004");
        for id in [&t1, &t2, &t3, &open] {
            txs.create(id, Utc::now()).await.unwrap();
        }

        txs.add_item(&t1, can, Utc::now()).await.unwrap();
        txs.add_item(&t1, bottle, Utc::now()).await.unwrap();
        txs.add_item(&t2, can, Utc::now()).await.unwrap();
        txs.add_item(&t3, bottle, Utc::now()).await.unwrap();
        txs.add_item(&open, can, Utc::now()).await.unwrap();

        txs.assign_user(&t1, &alice).await.unwrap();
        txs.assign_user(&t2, &alice).await.unwrap();
        txs.assign_user(&t3, &bob).await.unwrap();

        assert_eq!(db.users().points(&alice).await.unwrap(), 24);
        assert_eq!(db.users().points(&bob).await.unwrap(), 4);
    }
}
