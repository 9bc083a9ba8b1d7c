//! End-to-end deposit flow against a migrated SQLite database.

use std::sync::Arc;

use rvm_core::{CoreError, ErrorKind, Item, ItemId, NewUser, TransactionState, UserId};
use rvm_db::{Database, DbConfig};
use rvm_service::{PointsService, ServiceError, TransactionService};

struct Fixture {
    db: Arc<Database>,
    lifecycle: TransactionService<Database>,
    points: PointsService<Database>,
    user: UserId,
}

async fn fixture() -> Fixture {
    let db = Arc::new(Database::new(DbConfig::in_memory()).await.unwrap());

    db.items()
        .upsert(&Item {
            item_id: ItemId::new(7),
            name: "Aluminium can".into(),
            points: 10,
        })
        .await
        .unwrap();

    let user = UserId::parse("U1").unwrap();
    db.users()
        .create(&NewUser {
            user_id: user.clone(),
            full_name: "User One".into(),
            email: "u1@example.com".into(),
        })
        .await
        .unwrap();

    Fixture {
        lifecycle: TransactionService::with_uuid_ids(db.clone()),
        points: PointsService::new(db.clone()),
        db,
        user,
    }
}

#[tokio::test]
async fn deposit_two_items_and_assign() {
    let f = fixture().await;

    let tx = f.lifecycle.start_transaction().await.unwrap();
    assert!(tx.as_str().len() >= 12);
    let stored = f.db.transactions().get(&tx).await.unwrap().unwrap();
    assert_eq!(stored.state(), TransactionState::Open);

    assert_eq!(
        f.lifecycle.add_item_to_transaction(&tx, ItemId::new(7)).await.unwrap(),
        1
    );
    assert_eq!(
        f.lifecycle.add_item_to_transaction(&tx, ItemId::new(7)).await.unwrap(),
        2
    );

    let earned = f
        .lifecycle
        .end_transaction_and_assign_user(&tx, &f.user)
        .await
        .unwrap();
    assert_eq!(earned, 20);
    assert_eq!(f.points.get_points(&f.user).await.unwrap(), 20);
}

#[tokio::test]
async fn second_assignment_is_rejected_and_points_unchanged() {
    let f = fixture().await;

    let tx = f.lifecycle.start_transaction().await.unwrap();
    f.lifecycle.add_item_to_transaction(&tx, ItemId::new(7)).await.unwrap();
    f.lifecycle.add_item_to_transaction(&tx, ItemId::new(7)).await.unwrap();
    f.lifecycle
        .end_transaction_and_assign_user(&tx, &f.user)
        .await
        .unwrap();

    let err = f
        .lifecycle
        .end_transaction_and_assign_user(&tx, &f.user)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain {
            source: CoreError::TransactionAlreadyAssigned { .. },
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(f.points.get_points(&f.user).await.unwrap(), 20);

    let stored = f.db.transactions().get(&tx).await.unwrap().unwrap();
    assert_eq!(stored.user_id.as_ref(), Some(&f.user));
}

#[tokio::test]
async fn unknown_item_keeps_count() {
    let f = fixture().await;
    let tx = f.lifecycle.start_transaction().await.unwrap();
    f.lifecycle.add_item_to_transaction(&tx, ItemId::new(7)).await.unwrap();

    let err = f
        .lifecycle
        .add_item_to_transaction(&tx, ItemId::new(404))
        .await
        .unwrap_err();

    assert!(matches!(err.domain(), Some(CoreError::ItemNotFound(404))));
    assert_eq!(f.db.transactions().item_count(&tx).await.unwrap(), 1);
}

#[tokio::test]
async fn unregistered_user_cannot_close() {
    let f = fixture().await;
    let tx = f.lifecycle.start_transaction().await.unwrap();

    let err = f
        .lifecycle
        .end_transaction_and_assign_user(&tx, &UserId::parse("nobody").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err.domain(), Some(CoreError::UserNotFound(_))));
    assert!(!f.db.transactions().is_assigned(&tx).await.unwrap());
}

#[tokio::test]
async fn user_without_transactions_has_zero_points() {
    let f = fixture().await;
    assert_eq!(f.points.get_points(&f.user).await.unwrap(), 0);
}
