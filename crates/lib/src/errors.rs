use thiserror::Error;

/// Errors raised by the SQLite-backed stores (favorites, search history, schema).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage provider connection error: {0}")]
    Connection(String),
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),
}
