//! # In-Memory Store
//!
//! A process-local implementation of every store trait, used by service tests
//! and anywhere a throwaway ledger is enough.
//!
//! It mirrors the SQLite schema's constraints: duplicate keys surface as
//! `UniqueViolation`, dangling references as `ForeignKeyViolation`, negative
//! points as `CheckViolation`. Each method takes the lock once, so every call
//! is atomic the same way a single SQL statement is.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rvm_core::{Item, ItemId, NewUser, Transaction, TransactionId, TransactionItem, User, UserId};
use rvm_db::{DbError, DbResult};
use tokio::sync::Mutex;

use crate::ports::{Catalog, PointsStore, TransactionStore, UserStore};

#[derive(Debug, Default)]
struct Ledger {
    transactions: HashMap<TransactionId, Transaction>,
    items: BTreeMap<ItemId, Item>,
    users: HashMap<UserId, User>,
    deposits: Vec<TransactionItem>,
}

impl Ledger {
    fn points_of(&self, deposits: impl Iterator<Item = ItemId>) -> i64 {
        deposits
            .filter_map(|item_id| self.items.get(&item_id))
            .map(|item| item.points)
            .sum()
    }
}

/// In-memory ledger guarded by an async mutex.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    ledger: Mutex<Ledger>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a catalog entry.
    pub async fn upsert_item(&self, item: Item) -> DbResult<()> {
        if item.points < 0 {
            return Err(DbError::CheckViolation {
                message: "items.points must be >= 0".to_string(),
            });
        }
        self.ledger.lock().await.items.insert(item.item_id, item);
        Ok(())
    }

    /// Builder-style catalog seeding.
    pub async fn with_items(self, items: impl IntoIterator<Item = Item>) -> DbResult<Self> {
        for item in items {
            self.upsert_item(item).await?;
        }
        Ok(self)
    }

    /// Snapshot of a transaction.
    pub async fn transaction(&self, id: &TransactionId) -> Option<Transaction> {
        self.ledger.lock().await.transactions.get(id).cloned()
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn transaction_exists(&self, id: &TransactionId) -> DbResult<bool> {
        Ok(self.ledger.lock().await.transactions.contains_key(id))
    }

    async fn insert_transaction(
        &self,
        id: &TransactionId,
        created_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let mut ledger = self.ledger.lock().await;
        if ledger.transactions.contains_key(id) {
            return Err(DbError::UniqueViolation {
                field: "transactions.transaction_id".to_string(),
            });
        }
        ledger
            .transactions
            .insert(id.clone(), Transaction::open(id.clone(), created_at));
        Ok(())
    }

    async fn insert_transaction_item(
        &self,
        id: &TransactionId,
        item_id: ItemId,
        created_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let mut ledger = self.ledger.lock().await;
        if !ledger.transactions.contains_key(id) || !ledger.items.contains_key(&item_id) {
            return Err(DbError::ForeignKeyViolation {
                message: format!("deposit of item {item_id} into transaction {id}"),
            });
        }
        let transaction_item_id = ledger.deposits.len() as i64 + 1;
        ledger.deposits.push(TransactionItem {
            transaction_item_id,
            transaction_id: id.clone(),
            item_id,
            created_at,
        });
        Ok(())
    }

    async fn is_transaction_assigned(&self, id: &TransactionId) -> DbResult<bool> {
        Ok(self
            .ledger
            .lock()
            .await
            .transactions
            .get(id)
            .is_some_and(Transaction::is_assigned))
    }

    async fn assign_user(&self, id: &TransactionId, user_id: &UserId) -> DbResult<bool> {
        let mut ledger = self.ledger.lock().await;
        if !ledger.users.contains_key(user_id) {
            return Err(DbError::ForeignKeyViolation {
                message: format!("transaction {id} assigned to unknown user {user_id}"),
            });
        }
        match ledger.transactions.get_mut(id) {
            Some(tx) => Ok(tx.assign(user_id.clone()).is_ok()),
            None => Ok(false),
        }
    }

    async fn transaction_item_count(&self, id: &TransactionId) -> DbResult<i64> {
        let ledger = self.ledger.lock().await;
        Ok(ledger
            .deposits
            .iter()
            .filter(|d| &d.transaction_id == id)
            .count() as i64)
    }

    async fn transaction_points(&self, id: &TransactionId) -> DbResult<i64> {
        let ledger = self.ledger.lock().await;
        Ok(ledger.points_of(
            ledger
                .deposits
                .iter()
                .filter(|d| &d.transaction_id == id)
                .map(|d| d.item_id),
        ))
    }
}

#[async_trait]
impl Catalog for InMemoryStore {
    async fn item_exists(&self, item_id: ItemId) -> DbResult<bool> {
        Ok(self.ledger.lock().await.items.contains_key(&item_id))
    }

    async fn item_points(&self, item_id: ItemId) -> DbResult<Option<i64>> {
        Ok(self
            .ledger
            .lock()
            .await
            .items
            .get(&item_id)
            .map(|item| item.points))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn user_exists(&self, user_id: &UserId) -> DbResult<bool> {
        Ok(self.ledger.lock().await.users.contains_key(user_id))
    }

    async fn create_user(&self, user: &NewUser) -> DbResult<User> {
        let mut ledger = self.ledger.lock().await;
        if ledger.users.contains_key(&user.user_id) {
            return Err(DbError::UniqueViolation {
                field: "users.user_id".to_string(),
            });
        }
        let created = User {
            user_id: user.user_id.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            created_at: Utc::now(),
        };
        ledger.users.insert(created.user_id.clone(), created.clone());
        Ok(created)
    }
}

#[async_trait]
impl PointsStore for InMemoryStore {
    async fn user_points(&self, user_id: &UserId) -> DbResult<i64> {
        let ledger = self.ledger.lock().await;
        let owned = |tx_id: &TransactionId| {
            ledger
                .transactions
                .get(tx_id)
                .and_then(|tx| tx.user_id.as_ref())
                == Some(user_id)
        };
        Ok(ledger.points_of(
            ledger
                .deposits
                .iter()
                .filter(|d| owned(&d.transaction_id))
                .map(|d| d.item_id),
        ))
    }
}
