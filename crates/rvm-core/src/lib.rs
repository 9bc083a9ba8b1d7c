//! # rvm-core: Pure Domain Logic for the RVM Ledger
//!
//! Types and rules for reverse-vending-machine deposit transactions. Nothing
//! in here touches a database, a socket, or the file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RVM Ledger Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    rvm-cli (operator tooling)                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rvm-service                                  │   │
//! │  │    TransactionService, PointsService, RegistrationService       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rvm-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │    id     │  │   error   │  │ validation│  │   │
//! │  │   │Transaction│  │IdGenerator│  │ CoreError │  │   rules   │  │   │
//! │  │   │ Item/User │  │   UUID    │  │ ErrorKind │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    rvm-db (Database Layer)                      │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Identifiers and entities (Transaction, Item, User, ...)
//! - [`id`] - Transaction identifier generation
//! - [`error`] - Domain error types and their classification
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use rvm_core::id::{IdGenerator, UuidIdGenerator};
//! use rvm_core::{Transaction, TransactionState};
//!
//! let id = UuidIdGenerator.generate().unwrap();
//! assert!(id.as_str().len() >= rvm_core::TRANSACTION_ID_MIN_LEN);
//!
//! let tx = Transaction::open(id, chrono::Utc::now());
//! assert_eq!(tx.state(), TransactionState::Open);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod id;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use id::{IdGenerationError, IdGenerator, UuidIdGenerator};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Shortest accepted transaction identifier, in characters.
pub const TRANSACTION_ID_MIN_LEN: usize = 12;

/// Longest accepted transaction identifier, in characters.
pub const TRANSACTION_ID_MAX_LEN: usize = 256;

/// Longest accepted user identifier (identity-provider UIDs fit comfortably).
pub const USER_ID_MAX_LEN: usize = 255;

/// Longest accepted catalog item name.
pub const ITEM_NAME_MAX_LEN: usize = 200;
