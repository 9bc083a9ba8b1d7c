//! # rvm-service: Deposit Orchestration
//!
//! Services that drive a reverse-vending-machine deposit from the first item
//! to the points landing on a user's balance.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           rvm-service                                   │
//! │                                                                         │
//! │   TransactionService        PointsService       RegistrationService    │
//! │   ├── start_transaction     └── get_points      └── register           │
//! │   ├── add_item_to_transaction                                          │
//! │   └── end_transaction_and_assign_user                                  │
//! │            │                      │                   │                 │
//! │            ▼                      ▼                   ▼                 │
//! │   ┌───────────────────────── ports ─────────────────────────────┐      │
//! │   │ TransactionStore · Catalog · UserStore · PointsStore         │      │
//! │   │ IdentityProvider · IdGenerator (rvm-core)                    │      │
//! │   └──────────────────────────────────────────────────────────────┘      │
//! │            │                                      │                     │
//! │            ▼                                      ▼                     │
//! │   rvm_db::Database  /  InMemoryStore     StaticIdentityProvider        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use rvm_core::{ItemId, UserId};
//! use rvm_db::{Database, DbConfig};
//! use rvm_service::{PointsService, TransactionService};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Arc::new(Database::new(DbConfig::new("./data.db")).await?);
//! let lifecycle = TransactionService::with_uuid_ids(db.clone());
//!
//! let tx = lifecycle.start_transaction().await?;
//! lifecycle.add_item_to_transaction(&tx, ItemId::new(1)).await?;
//! let earned = lifecycle
//!     .end_transaction_and_assign_user(&tx, &UserId::parse("alice")?)
//!     .await?;
//!
//! let balance = PointsService::new(db).get_points(&UserId::parse("alice")?).await?;
//! # let _ = (earned, balance);
//! # Ok(())
//! # }
//! ```
//!
//! Caller deadlines: wrap any call in `tokio::time::timeout`. Dropping the
//! future abandons the in-flight statement; every write is a single
//! statement, so nothing is left half-applied.

pub mod adapters;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod memory;
pub mod points;
pub mod ports;
pub mod registration;

pub use error::{IdentityError, ServiceError, ServiceResult};
pub use identity::StaticIdentityProvider;
pub use lifecycle::TransactionService;
pub use memory::InMemoryStore;
pub use points::PointsService;
pub use ports::{Catalog, IdentityProvider, PointsStore, TransactionStore, UserStore};
pub use registration::RegistrationService;
