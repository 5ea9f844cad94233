//! Database-specific error types and conversions.

use agrolink_core::error::AgrolinkError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for AgrolinkError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AgrolinkError::NotFound { entity, id },
            other => AgrolinkError::Upstream(other.to_string()),
        }
    }
}
