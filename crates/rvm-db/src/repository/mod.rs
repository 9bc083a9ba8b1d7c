//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  TransactionService                                                    │
//! │       │                                                                 │
//! │       │  db.transactions().item_count(&id)                             │
//! │       ▼                                                                 │
//! │  TransactionRepository                                                 │
//! │  ├── exists / is_assigned                                              │
//! │  ├── create / add_item / assign_user                                   │
//! │  └── item_count / points                                               │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method is a single statement. Nothing here spans statements with an
//! explicit transaction; callers order their checks before their writes.
//!
//! ## Available Repositories
//!
//! - [`TransactionRepository`](transaction::TransactionRepository) - Transactions and deposit events
//! - [`ItemRepository`](item::ItemRepository) - Item catalog
//! - [`UserRepository`](user::UserRepository) - Users and derived point balances

pub mod item;
pub mod transaction;
pub mod user;

#[cfg(test)]
pub(crate) mod test_utils;
