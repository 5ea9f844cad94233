//! Error types for the Agrolink system.

use serde::Serialize;
use thiserror::Error;

/// A single rejected input field with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AgrolinkError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    #[error("Invalid query parameters: {fields:?}")]
    InvalidQuery { fields: Vec<String> },

    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl AgrolinkError {
    /// Shorthand for a single-field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AgrolinkError::Validation(vec![FieldError::new(field, message)])
    }
}

pub type AgrolinkResult<T> = Result<T, AgrolinkError>;
