//! Error types for rowsql

use thiserror::Error;

/// Result type alias for rowsql operations
pub type DbResult<T> = Result<T, DbError>;

/// Errors surfaced by the query helpers.
///
/// Driver failures are passed through as-is in [`DbError::Query`]; no attempt is
/// made to classify constraint violations or connectivity problems.
#[derive(Debug, Error)]
pub enum DbError {
    /// Error reported by the database driver
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Input rejected before the statement was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Pool checkout error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Errors raised by custom handle implementations
    #[error("{0}")]
    Other(String),
}

impl DbError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this error was raised before contacting the database
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the underlying driver error, if any.
    pub fn as_driver_error(&self) -> Option<&tokio_postgres::Error> {
        match self {
            Self::Query(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for DbError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
