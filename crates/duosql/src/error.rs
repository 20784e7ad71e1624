//! Error types for duosql

use thiserror::Error;

/// Result type alias for duosql operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for query building and pool operations
#[derive(Debug, Error)]
pub enum DbError {
    /// A statement was rendered without a target table
    #[error("table is required")]
    MissingTable,

    /// A statement was executed against a closed pool handle
    #[error("database connection is not available")]
    ConnectionUnavailable,

    /// Configuration could not be loaded or parsed
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Pool bring-up or connectivity probe failure
    #[error("connection error: {0}")]
    Connection(String),

    /// Builder state failed validation
    #[error("validation error: {0}")]
    Validation(String),

    /// Driver error, propagated unmodified
    #[error("query error: {0}")]
    Driver(#[from] sqlx::Error),

    /// Log file I/O failure
    #[error("log error: {0}")]
    Io(#[from] std::io::Error),
}

impl DbError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a missing-table error
    pub fn is_missing_table(&self) -> bool {
        matches!(self, Self::MissingTable)
    }

    /// Check if this is a connection-unavailable error
    pub fn is_connection_unavailable(&self) -> bool {
        matches!(self, Self::ConnectionUnavailable)
    }
}
