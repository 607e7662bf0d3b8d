//! Audit subsystem errors

use thiserror::Error;

use crate::books::CatalogError;

/// Result type alias for audit operations
pub type AuditResult<T> = std::result::Result<T, AuditError>;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Audit record {0} not found")]
    NotFound(i64),

    #[error("Audit record {0} is already completed")]
    AlreadyCompleted(i64),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Invalid audit record: {0}")]
    InvalidRecord(String),

    #[error("Book catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
