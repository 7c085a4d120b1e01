//! Error types for the feedback store

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connectivity, query or integrity errors from the database
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Connection URL with a scheme other than mysql or sqlite
    #[error("unsupported database backend: {0}")]
    UnsupportedBackend(String),

    /// Invalid database configuration
    #[error("database configuration error: {0}")]
    Config(String),

    /// A stored row that cannot be turned back into a record
    #[error("corrupt feedback row {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

impl StoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
