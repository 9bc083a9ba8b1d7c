//! # Service Errors
//!
//! Every failure a service operation can report, attributed to the operation
//! that produced it.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ServiceError                         kind()                           │
//! │  ────────────                         ──────                           │
//! │  Domain { TransactionNotFound }    →  NotFound                         │
//! │  Domain { ItemNotFound }           →  NotFound                         │
//! │  Domain { UserNotFound }           →  NotFound                         │
//! │  Domain { AlreadyAssigned }        →  Conflict                         │
//! │  Domain { UserAlreadyExists }      →  Conflict                         │
//! │  Domain { Validation }             →  InvalidInput                     │
//! │  InvalidCredential                 →  InvalidInput                     │
//! │  Storage / IdGeneration            →  Internal                         │
//! │  ProfileUnavailable                →  Internal                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rvm_core::{CoreError, ErrorKind, IdGenerationError};
use rvm_db::DbError;
use thiserror::Error;
use tracing::{error, warn};

/// Failure reported by an identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The credential could not be verified.
    #[error("credential rejected: {0}")]
    Rejected(String),

    /// The provider has no profile for this user.
    #[error("no profile for user {0}")]
    UnknownUser(String),

    /// The provider could not be reached.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Error returned by every service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A precondition was rejected before anything was written.
    #[error("{operation}: {source}")]
    Domain {
        operation: &'static str,
        source: CoreError,
    },

    /// The store failed.
    #[error("{operation}: storage failure: {source}")]
    Storage {
        operation: &'static str,
        source: DbError,
    },

    /// The id generator failed.
    #[error("{operation}: id generation failed: {source}")]
    IdGeneration {
        operation: &'static str,
        source: IdGenerationError,
    },

    /// The identity provider refused the credential.
    #[error("register: invalid credential: {source}")]
    InvalidCredential { source: IdentityError },

    /// The credential was valid but the profile could not be fetched.
    #[error("register: profile unavailable for {user_id}: {source}")]
    ProfileUnavailable {
        user_id: String,
        source: IdentityError,
    },
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Builds a `Domain` error for a rejected precondition and logs it.
    pub(crate) fn rejected(operation: &'static str, source: CoreError) -> Self {
        warn!(operation, error = %source, "Precondition rejected");
        ServiceError::Domain { operation, source }
    }

    /// `map_err` adapter turning a store failure into `Storage`, logged.
    pub(crate) fn storage(operation: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| {
            error!(operation, error = %source, "Storage failure");
            ServiceError::Storage { operation, source }
        }
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Domain { source, .. } => source.kind(),
            ServiceError::InvalidCredential { .. } => ErrorKind::InvalidInput,
            ServiceError::Storage { .. }
            | ServiceError::IdGeneration { .. }
            | ServiceError::ProfileUnavailable { .. } => ErrorKind::Internal,
        }
    }

    /// Name of the operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            ServiceError::Domain { operation, .. }
            | ServiceError::Storage { operation, .. }
            | ServiceError::IdGeneration { operation, .. } => operation,
            ServiceError::InvalidCredential { .. } | ServiceError::ProfileUnavailable { .. } => {
                "register"
            }
        }
    }

    /// The domain error, if this is a rejected precondition.
    pub fn domain(&self) -> Option<&CoreError> {
        match self {
            ServiceError::Domain { source, .. } => Some(source),
            _ => None,
        }
    }
}
