//! Storage errors

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLx error
    #[error("storage error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Result alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
