//! # Transaction Repository
//!
//! Database operations for transactions and their deposit events.
//!
//! ## Transaction Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Transaction Lifecycle                             │
//! │                                                                         │
//! │  1. OPEN                                                               │
//! │     └── create() → transactions row, user_id NULL                      │
//! │                                                                         │
//! │  2. DEPOSIT (zero or more)                                             │
//! │     └── add_item() → transaction_items row                             │
//! │     └── item_count() → COUNT(*) re-read after every insert             │
//! │                                                                         │
//! │  3. CLOSE                                                              │
//! │     └── assign_user() → UPDATE ... WHERE user_id IS NULL               │
//! │     └── points() → SUM(items.points) re-read after the update          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use rvm_core::{ItemId, Transaction, TransactionId, TransactionItem, UserId};

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Checks whether a transaction row exists.
    pub async fn exists(&self, id: &TransactionId) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE transaction_id = ?1")
                .bind(id.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Gets a transaction by ID.
    pub async fn get(&self, id: &TransactionId) -> DbResult<Option<Transaction>> {
        let tx = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT
                transaction_id AS id,
                user_id,
                created_at
            FROM transactions
            WHERE transaction_id = ?1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(tx)
    }

    /// Inserts a new open transaction.
    ///
    /// ## Errors
    /// `UniqueViolation` if the id is already taken.
    pub async fn create(&self, id: &TransactionId, created_at: DateTime<Utc>) -> DbResult<Transaction> {
        debug!(transaction_id = %id, "Creating transaction");

        sqlx::query(
            r#"
            INSERT INTO transactions (transaction_id, user_id, created_at)
            VALUES (?1, NULL, ?2)
            "#,
        )
        .bind(id.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Transaction::open(id.clone(), created_at))
    }

    /// Records one deposit event and returns its row id.
    ///
    /// No state check: the row is appended whether or not the transaction
    /// has been assigned.
    pub async fn add_item(
        &self,
        id: &TransactionId,
        item_id: ItemId,
        created_at: DateTime<Utc>,
    ) -> DbResult<i64> {
        debug!(transaction_id = %id, item_id = %item_id, "Adding transaction item");

        let result = sqlx::query(
            r#"
            INSERT INTO transaction_items (transaction_id, item_id, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(id.as_str())
        .bind(item_id.get())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Counts deposit events in a transaction.
    pub async fn item_count(&self, id: &TransactionId) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transaction_items WHERE transaction_id = ?1")
                .bind(id.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Gets all deposit events of a transaction, oldest first.
    pub async fn items(&self, id: &TransactionId) -> DbResult<Vec<TransactionItem>> {
        let items = sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT
                transaction_item_id,
                transaction_id,
                item_id,
                created_at
            FROM transaction_items
            WHERE transaction_id = ?1
            ORDER BY transaction_item_id
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Whether the transaction already carries a user.
    ///
    /// `false` for a transaction that doesn't exist.
    pub async fn is_assigned(&self, id: &TransactionId) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM transactions
            WHERE transaction_id = ?1 AND user_id IS NOT NULL
            "#,
        )
        .bind(id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Closes the transaction by setting its user.
    ///
    /// ## Returns
    /// * `true` - this call performed the assignment
    /// * `false` - nothing changed: the transaction is missing or already assigned
    ///
    /// The `user_id IS NULL` guard makes the assignment at-most-once even
    /// when two callers race past their own `is_assigned` checks.
    pub async fn assign_user(&self, id: &TransactionId, user_id: &UserId) -> DbResult<bool> {
        debug!(transaction_id = %id, user_id = %user_id, "Assigning transaction");

        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET user_id = ?1
            WHERE transaction_id = ?2 AND user_id IS NULL
            "#,
        )
        .bind(user_id.as_str())
        .bind(id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Sums the point value of every deposit in the transaction.
    ///
    /// 0 for a transaction with no deposits.
    pub async fn points(&self, id: &TransactionId) -> DbResult<i64> {
        let points: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(items.points), 0)
            FROM transaction_items
            INNER JOIN items ON items.item_id = transaction_items.item_id
            WHERE transaction_items.transaction_id = ?1
            "#,
        )
        .bind(id.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(points)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
