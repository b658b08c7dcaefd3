mod config;
mod connection;
mod convert;
mod error;
mod store;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoRecordStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::DuplicateId { table, id } => StorageError::Duplicate { table, id },
            MongoDaoError::Malformed { table, message } => StorageError::Malformed { table, message },
            other => StorageError::unavailable(other.to_string(), other),
        }
    }
}
