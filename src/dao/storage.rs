use std::error::Error;
use thiserror::Error;

use crate::dao::record_store::Table;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend unreachable or the operation failed in transit.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// What was being attempted.
        message: String,
        /// Backend error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A record with this id is already stored.
    #[error("record `{id}` already exists in `{table}`")]
    Duplicate {
        /// Target table.
        table: Table,
        /// Conflicting id.
        id: String,
    },
    /// A stored document does not decode into its record type.
    #[error("malformed record in `{table}`: {message}")]
    Malformed {
        /// Source table.
        table: Table,
        /// Decoding error.
        message: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a malformed-record error for the given table.
    pub fn malformed(table: Table, message: impl Into<String>) -> Self {
        StorageError::Malformed {
            table,
            message: message.into(),
        }
    }
}
