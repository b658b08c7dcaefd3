mod config;
mod error;
mod models;
mod store;

pub use config::CouchConfig;
pub use error::CouchDaoError;
pub use store::CouchRecordStore;

use crate::dao::storage::StorageError;

impl From<CouchDaoError> for StorageError {
    fn from(err: CouchDaoError) -> Self {
        match err {
            CouchDaoError::Conflict { table, id } => StorageError::Duplicate { table, id },
            CouchDaoError::InvalidDocument { table, message } => {
                StorageError::Malformed { table, message }
            }
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
