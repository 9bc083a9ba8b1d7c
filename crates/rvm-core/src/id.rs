//! # Transaction Identifier Generation
//!
//! Identifiers are random UUID v4 strings (36 characters). They are never
//! checked against storage for collisions; with 122 random bits the odds of a
//! clash are negligible for the lifetime of a deployment.

use thiserror::Error;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::types::TransactionId;

/// Identifier generation failures.
#[derive(Debug, Error)]
pub enum IdGenerationError {
    /// The randomness source could not produce bytes.
    #[error("entropy source unavailable: {0}")]
    Entropy(String),

    /// The generator produced something that isn't a valid transaction id.
    #[error("generated identifier rejected: {0}")]
    Invalid(#[from] ValidationError),
}

/// Produces fresh transaction identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Result<TransactionId, IdGenerationError>;
}

/// UUID v4 backed generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> Result<TransactionId, IdGenerationError> {
        let id = TransactionId::parse(Uuid::new_v4().to_string())?;
        Ok(id)
    }
}
