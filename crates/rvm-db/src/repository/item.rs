//! # Item Repository
//!
//! The item catalog: which recyclables a machine accepts and how many points
//! each deposit is worth. Read by the deposit path, written by seeding.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use rvm_core::{Item, ItemId};

/// Repository for the item catalog.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Checks whether an item code is in the catalog.
    pub async fn exists(&self, item_id: ItemId) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE item_id = ?1")
            .bind(item_id.get())
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Gets a catalog entry.
    pub async fn get(&self, item_id: ItemId) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            "SELECT item_id, name, points FROM items WHERE item_id = ?1",
        )
        .bind(item_id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Point value of an item, `None` if the code is unknown.
    pub async fn points(&self, item_id: ItemId) -> DbResult<Option<i64>> {
        let points: Option<i64> = sqlx::query_scalar("SELECT points FROM items WHERE item_id = ?1")
            .bind(item_id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(points)
    }

    /// Lists the whole catalog ordered by item code.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT item_id, name, points FROM items ORDER BY item_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts or updates a catalog entry.
    ///
    /// Changing `points` affects every balance derived afterwards, including
    /// transactions that were closed under the old value.
    pub async fn upsert(&self, item: &Item) -> DbResult<()> {
        debug!(item_id = %item.item_id, points = item.points, "Upserting item");

        sqlx::query(
            r#"
            INSERT INTO items (item_id, name, points)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (item_id) DO UPDATE SET
                name = excluded.name,
                points = excluded.points
            "#,
        )
        .bind(item.item_id.get())
        .bind(&item.name)
        .bind(item.points)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts catalog entries (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
