//! Storage-specific error types for SQLite operations.
//!
//! Diesel and r2d2 errors stay inside this crate. Callers in the chat core
//! see them as `AiError::TemplateStore`.

use diesel::result::Error as DieselError;
use quill_ai::AiError;
use thiserror::Error;

/// Storage-specific errors that wrap Diesel and r2d2 types.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database writer is not running")]
    WriterUnavailable,

    #[error("Internal storage error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::ConnectionFailed(_) => "DB_CONNECTION_FAILED",
            StorageError::PoolError(_) => "DB_POOL_ERROR",
            StorageError::QueryFailed(_) => "DB_QUERY_FAILED",
            StorageError::MigrationFailed(_) => "DB_MIGRATION_FAILED",
            StorageError::Io(_) => "DB_IO_ERROR",
            StorageError::InvalidInput(_) => "INVALID_INPUT",
            StorageError::WriterUnavailable => "DB_WRITER_UNAVAILABLE",
            StorageError::Internal(_) => "DB_INTERNAL_ERROR",
        }
    }
}

impl From<StorageError> for AiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidInput(msg) => AiError::InvalidInput(msg),
            other => AiError::TemplateStore(other.to_string()),
        }
    }
}
