//! # Domain Types
//!
//! Identifiers and entities used throughout the RVM ledger.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Transaction    │   │ TransactionItem │   │      Item       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (12..=256)  │◄──│  transaction_id │   │  item_id (i64)  │       │
//! │  │  user_id (opt)  │   │  item_id        │──►│  name           │       │
//! │  │  created_at     │   │  created_at     │   │  points (>= 0)  │       │
//! │  └────────┬────────┘   └─────────────────┘   └─────────────────┘       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      User       │   │TransactionState │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  user_id        │   │  Open           │                             │
//! │  │  full_name      │   │  Closed         │                             │
//! │  │  email          │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A user's point balance is never stored. It is always derived from the
//! items deposited into the transactions assigned to that user.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::validation::{validate_transaction_id, validate_user_id};

// =============================================================================
// Transaction Id
// =============================================================================

/// Opaque transaction identifier, 12 to 256 characters.
///
/// Construct through [`TransactionId::parse`] so the length bound always
/// holds for values created in process. Values decoded from storage are
/// trusted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(String);

impl TransactionId {
    /// Validates and wraps an identifier.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_transaction_id(&value)?;
        Ok(TransactionId(value))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TransactionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionId::parse(s)
    }
}

impl TryFrom<String> for TransactionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TransactionId::parse(value)
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.0
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// User Id
// =============================================================================

/// User identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validates and wraps a user identifier.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_user_id(&value)?;
        Ok(UserId(value))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserId::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        UserId::parse(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

// =============================================================================
// Item Id
// =============================================================================

/// Catalog key of a recyclable item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        ItemId(id)
    }

    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId(id)
    }
}

// =============================================================================
// Transaction State
// =============================================================================

/// Lifecycle state of a transaction.
///
/// ```text
/// NonExistent ──start──► Open ──end_and_assign──► Closed (terminal)
///                         │  ▲
///                         └──┘ add_item
/// ```
///
/// `NonExistent` has no value here: a transaction that doesn't exist has no
/// row to carry a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    /// Accepting deposits, no user yet.
    Open,
    /// Assigned to a user. Never reopens.
    Closed,
}

impl TransactionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionState::Open => "open",
            TransactionState::Closed => "closed",
        }
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A deposit session at a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    /// Unique identifier, immutable.
    pub id: TransactionId,

    /// The user credited with this transaction. `None` while open.
    pub user_id: Option<UserId>,

    /// When the transaction was started.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a new open transaction.
    pub fn open(id: TransactionId, created_at: DateTime<Utc>) -> Self {
        Transaction {
            id,
            user_id: None,
            created_at,
        }
    }

    /// Derives the lifecycle state from the assignment column.
    #[inline]
    pub fn state(&self) -> TransactionState {
        if self.user_id.is_some() {
            TransactionState::Closed
        } else {
            TransactionState::Open
        }
    }

    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.user_id.is_some()
    }

    /// Closes the transaction by assigning it to `user_id`.
    ///
    /// ## Errors
    /// `TransactionAlreadyAssigned` if a user is already set; the existing
    /// assignment is left untouched.
    pub fn assign(&mut self, user_id: UserId) -> CoreResult<()> {
        if self.is_assigned() {
            return Err(CoreError::TransactionAlreadyAssigned {
                transaction_id: self.id.to_string(),
            });
        }
        self.user_id = Some(user_id);
        Ok(())
    }
}

// =============================================================================
// Item
// =============================================================================

/// A catalog entry: something the machine accepts and what it is worth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    pub item_id: ItemId,

    /// Display name ("PET bottle 500ml").
    pub name: String,

    /// Points awarded per deposit. Never negative.
    pub points: i64,
}

// =============================================================================
// Transaction Item
// =============================================================================

/// One deposit event. The same item may appear many times in a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionItem {
    pub transaction_item_id: i64,
    pub transaction_id: TransactionId,
    pub item_id: ItemId,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// A registered account that can be credited with transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub user_id: UserId,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Data needed to register a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub user_id: UserId,
    pub full_name: String,
    pub email: String,
}

/// Profile data as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: String,
    pub email: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
