//! # Validation Module
//!
//! Input validation rules shared by the identifier types and the catalog /
//! user maintenance paths.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (CLI args, machine firmware)                          │
//! │  └── Type parsing (item ids are integers)                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Identifier lengths, non-negative points, required fields          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (points >= 0)                                    │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rvm_core::validation::{validate_transaction_id, validate_points};
//!
//! validate_transaction_id("550e8400-e29b-41d4-a716-446655440000").unwrap();
//! assert!(validate_points(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::{ITEM_NAME_MAX_LEN, TRANSACTION_ID_MAX_LEN, TRANSACTION_ID_MIN_LEN, USER_ID_MAX_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a transaction identifier.
///
/// ## Rules
/// - Between 12 and 256 characters (inclusive)
///
/// Uniqueness is NOT checked here; generated identifiers are random enough
/// that storage is never consulted.
pub fn validate_transaction_id(id: &str) -> ValidationResult<()> {
    let len = id.chars().count();

    if len < TRANSACTION_ID_MIN_LEN {
        return Err(ValidationError::TooShort {
            field: "transaction id".to_string(),
            min: TRANSACTION_ID_MIN_LEN,
        });
    }

    if len > TRANSACTION_ID_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "transaction id".to_string(),
            max: TRANSACTION_ID_MAX_LEN,
        });
    }

    Ok(())
}

/// Validates a user identifier as issued by the identity provider.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most 255 characters
pub fn validate_user_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "user_id".to_string(),
        });
    }

    if id.chars().count() > USER_ID_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "user_id".to_string(),
            max: USER_ID_MAX_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a catalog item name.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > ITEM_NAME_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: ITEM_NAME_MAX_LEN,
        });
    }

    Ok(())
}

/// Validates an item point value. Zero is allowed (non-rewarding items).
pub fn validate_points(points: i64) -> ValidationResult<()> {
    if points < 0 {
        return Err(ValidationError::Negative {
            field: "points".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Profile Validators
// =============================================================================

/// Validates an email address (shape only, deliverability is the identity
/// provider's problem).
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected local@domain".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
