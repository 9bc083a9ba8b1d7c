use rvm_core::{Item, ItemId, NewUser, TransactionId, UserId};

use crate::{Database, DbConfig};

/// Fresh, migrated in-memory database.
pub(crate) async fn setup_test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

pub(crate) async fn seed_item(db: &Database, item_id: i64, points: i64) -> ItemId {
    let item = Item {
        item_id: ItemId::new(item_id),
        name: format!("Item {item_id}"),
        points,
    };
    db.items().upsert(&item).await.expect("seed item");
    item.item_id
}

pub(crate) async fn seed_user(db: &Database, user_id: &str) -> UserId {
    let user = NewUser {
        user_id: UserId::parse(user_id).expect("valid user id"),
        full_name: format!("User {user_id}"),
        email: format!("{user_id}@example.com"),
    };
    db.users().create(&user).await.expect("seed user");
    user.user_id
}

pub(crate) fn tx_id(value: &str) -> TransactionId {
    TransactionId::parse(value).expect("valid transaction id")
}
