//! # Error Types
//!
//! Domain-specific error types for rvm-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rvm-core errors (this file)                                           │
//! │  ├── CoreError        - Lifecycle precondition failures                │
//! │  └── ValidationError  - Malformed identifiers and fields               │
//! │                                                                         │
//! │  rvm-db errors (separate crate)                                        │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  rvm-service errors                                                    │
//! │  └── ServiceError     - What callers branch on (kind())                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Classification
//! Every error answers [`ErrorKind`] so callers branch on a tag, never on a
//! message string:
//!
//! | Kind           | Meaning                                   | Retry? |
//! |----------------|-------------------------------------------|--------|
//! | `NotFound`     | transaction / item / user absent          | no     |
//! | `Conflict`     | transaction already assigned, user exists | no     |
//! | `InvalidInput` | malformed id, rejected credential         | no     |
//! | `Internal`     | storage or generator failure              | caller |

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of a failure, stable across error enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced transaction, item or user does not exist.
    NotFound,
    /// The request contradicts current state (e.g. double assignment).
    Conflict,
    /// The request itself is malformed.
    InvalidInput,
    /// Storage, generator or collaborator failure.
    Internal,
}

impl ErrorKind {
    /// Machine-readable code, e.g. for CLI exit reporting.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Lifecycle rule violations.
///
/// These are the outcomes the transaction state machine can reach without
/// anything being broken: the caller asked for something the current state
/// does not allow.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Transaction cannot be found.
    #[error("transaction does not exist: {0}")]
    TransactionNotFound(String),

    /// Item code is not in the catalog.
    ///
    /// ## When This Occurs
    /// - The machine reported an item code the catalog doesn't know
    /// - The catalog was reseeded without that code
    #[error("item does not exist: {0}")]
    ItemNotFound(i64),

    /// User is not registered.
    #[error("user does not exist: {0}")]
    UserNotFound(String),

    /// Transaction already carries a user and is therefore closed.
    ///
    /// ## User Workflow
    /// ```text
    /// Scan QR (user A) ──► end_transaction_and_assign_user ──► 20 points
    ///      │
    ///      ▼
    /// Scan QR again (user A or B)
    ///      │
    ///      ▼
    /// TransactionAlreadyAssigned { transaction_id }
    /// ```
    #[error("transaction {transaction_id} is already assigned")]
    TransactionAlreadyAssigned { transaction_id: String },

    /// A user with this identifier is already registered.
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::TransactionNotFound(_)
            | CoreError::ItemNotFound(_)
            | CoreError::UserNotFound(_) => ErrorKind::NotFound,
            CoreError::TransactionAlreadyAssigned { .. } | CoreError::UserAlreadyExists(_) => {
                ErrorKind::Conflict
            }
            CoreError::Validation(_) => ErrorKind::InvalidInput,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised when constructing identifiers or entities from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters long")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters long")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
