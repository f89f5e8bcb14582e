// src/error.rs
//! Error types for the saved field store

use thiserror::Error;

use crate::validation::FieldErrors;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Draft rejected by validation; nothing was written
    #[error("invalid field definition: {0}")]
    Invalid(FieldErrors),

    #[error("field already exists: {field_id}")]
    Conflict { field_id: String },

    #[error("field not found: {field_id}")]
    NotFound { field_id: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored definition could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            StoreError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}
