use mongodb::error::Error as MongoError;
use thiserror::Error;

use crate::dao::record_store::Table;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures raised by the MongoDB record store.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// Required environment variable is missing.
    #[error("missing MongoDB environment variable `{var}`")]
    MissingEnvVar {
        /// Variable name.
        var: &'static str,
    },
    /// Connection URI could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// Rejected URI.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Client could not be built from the parsed options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Server never answered the startup pings.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Pings tried.
        attempts: u32,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Periodic health ping failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Lookup index could not be created.
    #[error("failed to ensure index `{index}` on collection `{table}`")]
    EnsureIndex {
        /// Affected table.
        table: Table,
        /// Index name.
        index: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Query failed.
    #[error("failed to read from collection `{table}`")]
    Read {
        /// Affected table.
        table: Table,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Insert or update failed.
    #[error("failed to write to collection `{table}`")]
    Write {
        /// Affected table.
        table: Table,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A record with the same identifier already exists.
    #[error("record `{id}` already exists in `{table}`")]
    DuplicateId {
        /// Affected table.
        table: Table,
        /// Record id.
        id: String,
    },
    /// Stored document could not be mapped to a record.
    #[error("malformed record in `{table}`: {message}")]
    Malformed {
        /// Affected table.
        table: Table,
        /// What went wrong.
        message: String,
    },
}
