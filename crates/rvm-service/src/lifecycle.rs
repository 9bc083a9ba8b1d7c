//! # Transaction Lifecycle Service
//!
//! The deposit state machine.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   NonExistent ──start_transaction()──► Open ──end_and_assign()──► Closed│
//! │                                         │  ▲                       │    │
//! │                                         └──┘                       │    │
//! │                                      add_item()                    │    │
//! │                                                                    │    │
//! │   Closed is terminal. add_item() on Closed still appends ◄─────────┘    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Check Order
//! | Operation                           | Checks, first failure wins                 |
//! |-------------------------------------|--------------------------------------------|
//! | `add_item_to_transaction`           | transaction exists → item exists           |
//! | `end_transaction_and_assign_user`   | transaction exists → user exists → unassigned |
//!
//! Nothing is written until every check has passed. Counts and point totals
//! are re-read from the store after the write, never computed locally.

use std::sync::Arc;

use chrono::Utc;
use rvm_core::{CoreError, IdGenerator, ItemId, TransactionId, UserId, UuidIdGenerator};
use tracing::{info, instrument};

use crate::error::{ServiceError, ServiceResult};
use crate::ports::{Catalog, TransactionStore, UserStore};

/// Drives transactions from open to closed.
#[derive(Debug)]
pub struct TransactionService<S, G = UuidIdGenerator> {
    store: Arc<S>,
    ids: G,
}

impl<S> TransactionService<S, UuidIdGenerator> {
    /// Service issuing UUID v4 transaction ids.
    pub fn with_uuid_ids(store: Arc<S>) -> Self {
        TransactionService {
            store,
            ids: UuidIdGenerator,
        }
    }
}

impl<S, G> TransactionService<S, G>
where
    S: TransactionStore + Catalog + UserStore,
    G: IdGenerator,
{
    pub fn new(store: Arc<S>, ids: G) -> Self {
        TransactionService { store, ids }
    }

    /// Opens a new transaction and returns its id.
    ///
    /// Generator and storage failures are both `Internal`.
    #[instrument(skip(self))]
    pub async fn start_transaction(&self) -> ServiceResult<TransactionId> {
        const OP: &str = "start_transaction";

        let id = self
            .ids
            .generate()
            .map_err(|source| ServiceError::IdGeneration {
                operation: OP,
                source,
            })?;

        self.store
            .insert_transaction(&id, Utc::now())
            .await
            .map_err(ServiceError::storage(OP))?;

        info!(transaction_id = %id, "Transaction opened");
        Ok(id)
    }

    /// Records one deposit and returns the transaction's item count.
    ///
    /// The transaction's state is not checked: a closed transaction still
    /// accepts deposits.
    #[instrument(skip_all, fields(transaction_id = %transaction_id, item_id = %item_id))]
    pub async fn add_item_to_transaction(
        &self,
        transaction_id: &TransactionId,
        item_id: ItemId,
    ) -> ServiceResult<i64> {
        const OP: &str = "add_item_to_transaction";

        if !self
            .store
            .transaction_exists(transaction_id)
            .await
            .map_err(ServiceError::storage(OP))?
        {
            return Err(ServiceError::rejected(
                OP,
                CoreError::TransactionNotFound(transaction_id.to_string()),
            ));
        }

        if !self
            .store
            .item_exists(item_id)
            .await
            .map_err(ServiceError::storage(OP))?
        {
            return Err(ServiceError::rejected(OP, CoreError::ItemNotFound(item_id.get())));
        }

        self.store
            .insert_transaction_item(transaction_id, item_id, Utc::now())
            .await
            .map_err(ServiceError::storage(OP))?;

        let count = self
            .store
            .transaction_item_count(transaction_id)
            .await
            .map_err(ServiceError::storage(OP))?;

        info!(item_count = count, "Item deposited");
        Ok(count)
    }

    /// Closes the transaction by assigning it to a user, returning its points.
    ///
    /// At most one call per transaction succeeds. A caller that loses a race
    /// against a concurrent close gets `TransactionAlreadyAssigned` too.
    #[instrument(skip_all, fields(transaction_id = %transaction_id, user_id = %user_id))]
    pub async fn end_transaction_and_assign_user(
        &self,
        transaction_id: &TransactionId,
        user_id: &UserId,
    ) -> ServiceResult<i64> {
        const OP: &str = "end_transaction_and_assign_user";

        if !self
            .store
            .transaction_exists(transaction_id)
            .await
            .map_err(ServiceError::storage(OP))?
        {
            return Err(ServiceError::rejected(
                OP,
                CoreError::TransactionNotFound(transaction_id.to_string()),
            ));
        }

        if !self
            .store
            .user_exists(user_id)
            .await
            .map_err(ServiceError::storage(OP))?
        {
            return Err(ServiceError::rejected(
                OP,
                CoreError::UserNotFound(user_id.to_string()),
            ));
        }

        let already_assigned = || {
            ServiceError::rejected(
                OP,
                CoreError::TransactionAlreadyAssigned {
                    transaction_id: transaction_id.to_string(),
                },
            )
        };

        if self
            .store
            .is_transaction_assigned(transaction_id)
            .await
            .map_err(ServiceError::storage(OP))?
        {
            return Err(already_assigned());
        }

        let assigned = self
            .store
            .assign_user(transaction_id, user_id)
            .await
            .map_err(ServiceError::storage(OP))?;
        if !assigned {
            return Err(already_assigned());
        }

        let points = self
            .store
            .transaction_points(transaction_id)
            .await
            .map_err(ServiceError::storage(OP))?;

        info!(points, "Transaction closed");
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use rvm_core::{ErrorKind, IdGenerationError, Item, NewUser, TransactionState};
    use rvm_db::{Database, DbConfig};

    struct FailingIdGenerator;

    impl IdGenerator for FailingIdGenerator {
        fn generate(&self) -> Result<TransactionId, IdGenerationError> {
            Err(IdGenerationError::Entropy("no randomness".into()))
        }
    }

    async fn store() -> Arc<InMemoryStore> {
        let store = InMemoryStore::new()
            .with_items([
                Item {
                    item_id: ItemId::new(7),
                    name: "Can".into(),
                    points: 10,
                },
                Item {
                    item_id: ItemId::new(8),
                    name: "Bottle".into(),
                    points: 4,
                },
            ])
            .await
            .unwrap();
        for user in ["alice", "bob"] {
            store
                .create_user(&NewUser {
                    user_id: UserId::parse(user).unwrap(),
                    full_name: user.into(),
                    email: format!("{user}@example.com"),
                })
                .await
                .unwrap();
        }
        Arc::new(store)
    }

    fn user(value: &str) -> UserId {
        UserId::parse(value).unwrap()
    }

    fn domain(err: &ServiceError) -> &CoreError {
        err.domain().expect("domain error")
    }

    #[tokio::test]
    async fn test_start_transaction_opens_unassigned() {
        let store = store().await;
        let service = TransactionService::with_uuid_ids(store.clone());

        let id = service.start_transaction().await.unwrap();

        assert!(id.as_str().len() >= 12);
        let tx = store.transaction(&id).await.unwrap();
        assert_eq!(tx.state(), TransactionState::Open);
        assert!(!store.is_transaction_assigned(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_start_transaction_generator_failure_is_internal() {
        let service = TransactionService::new(store().await, FailingIdGenerator);

        let err = service.start_transaction().await.unwrap_err();
        assert!(matches!(err, ServiceError::IdGeneration { .. }));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.operation(), "start_transaction");
    }

    #[tokio::test]
    async fn test_add_item_counts_duplicates() {
        let service = TransactionService::with_uuid_ids(store().await);
        let id = service.start_transaction().await.unwrap();

        assert_eq!(service.add_item_to_transaction(&id, ItemId::new(7)).await.unwrap(), 1);
        assert_eq!(service.add_item_to_transaction(&id, ItemId::new(7)).await.unwrap(), 2);
        assert_eq!(service.add_item_to_transaction(&id, ItemId::new(8)).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_add_item_unknown_transaction_checked_first() {
        let service = TransactionService::with_uuid_ids(store().await);
        let missing = TransactionId::parse("tx-missing-0001").unwrap();

        // Unknown item too, but the transaction check wins
        let err = service
            .add_item_to_transaction(&missing, ItemId::new(999))
            .await
            .unwrap_err();
        assert!(matches!(domain(&err), CoreError::TransactionNotFound(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_add_unknown_item_leaves_count_unchanged() {
        let store = store().await;
        let service = TransactionService::with_uuid_ids(store.clone());
        let id = service.start_transaction().await.unwrap();
        service.add_item_to_transaction(&id, ItemId::new(7)).await.unwrap();

        let err = service
            .add_item_to_transaction(&id, ItemId::new(999))
            .await
            .unwrap_err();
        assert!(matches!(domain(&err), CoreError::ItemNotFound(999)));
        assert_eq!(store.transaction_item_count(&id).await.unwrap(), 1);
    }

    /// Known quirk: closing a transaction does not stop further deposits.
    #[tokio::test]
    async fn test_known_quirk_closed_transaction_accepts_items() {
        let store = store().await;
        let service = TransactionService::with_uuid_ids(store.clone());
        let id = service.start_transaction().await.unwrap();
        service.add_item_to_transaction(&id, ItemId::new(7)).await.unwrap();
        service
            .end_transaction_and_assign_user(&id, &user("alice"))
            .await
            .unwrap();

        let count = service.add_item_to_transaction(&id, ItemId::new(8)).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(store.transaction_points(&id).await.unwrap(), 14);
    }

    #[tokio::test]
    async fn test_end_returns_points_and_closes() {
        let store = store().await;
        let service = TransactionService::with_uuid_ids(store.clone());
        let id = service.start_transaction().await.unwrap();
        service.add_item_to_transaction(&id, ItemId::new(7)).await.unwrap();
        service.add_item_to_transaction(&id, ItemId::new(8)).await.unwrap();

        let points = service
            .end_transaction_and_assign_user(&id, &user("alice"))
            .await
            .unwrap();

        assert_eq!(points, 14);
        let tx = store.transaction(&id).await.unwrap();
        assert_eq!(tx.state(), TransactionState::Closed);
        assert_eq!(tx.user_id, Some(user("alice")));
    }

    #[tokio::test]
    async fn test_end_empty_transaction_is_zero_points() {
        let service = TransactionService::with_uuid_ids(store().await);
        let id = service.start_transaction().await.unwrap();

        let points = service
            .end_transaction_and_assign_user(&id, &user("alice"))
            .await
            .unwrap();
        assert_eq!(points, 0);
    }

    #[tokio::test]
    async fn test_end_check_order() {
        let service = TransactionService::with_uuid_ids(store().await);
        let missing = TransactionId::parse("tx-missing-0001").unwrap();

        let err = service
            .end_transaction_and_assign_user(&missing, &user("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(domain(&err), CoreError::TransactionNotFound(_)));

        let id = service.start_transaction().await.unwrap();
        let err = service
            .end_transaction_and_assign_user(&id, &user("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(domain(&err), CoreError::UserNotFound(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_second_assignment_is_conflict() {
        let store = store().await;
        let service = TransactionService::with_uuid_ids(store.clone());
        let id = service.start_transaction().await.unwrap();
        service.add_item_to_transaction(&id, ItemId::new(7)).await.unwrap();
        service
            .end_transaction_and_assign_user(&id, &user("alice"))
            .await
            .unwrap();

        let err = service
            .end_transaction_and_assign_user(&id, &user("bob"))
            .await
            .unwrap_err();

        assert!(matches!(
            domain(&err),
            CoreError::TransactionAlreadyAssigned { .. }
        ));
        assert_eq!(err.kind(), ErrorKind::Conflict);
        let tx = store.transaction(&id).await.unwrap();
        assert_eq!(tx.user_id, Some(user("alice")));
    }

    #[tokio::test]
    async fn test_concurrent_closers_assign_once() {
        let store = store().await;
        let service = Arc::new(TransactionService::with_uuid_ids(store.clone()));
        let id = service.start_transaction().await.unwrap();
        service.add_item_to_transaction(&id, ItemId::new(7)).await.unwrap();

        let alice = user("alice");
        let bob = user("bob");
        let (a, b) = tokio::join!(
            service.end_transaction_and_assign_user(&id, &alice),
            service.end_transaction_and_assign_user(&id, &bob),
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let loser = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(loser.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;
        let service = TransactionService::with_uuid_ids(Arc::new(db));

        let err = service.start_transaction().await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage { .. }));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
