//! Error types shared by the CouchDB record store.

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::record_store::Table;

/// Convenient result alias returning [`CouchDaoError`] failures.
pub type CouchResult<T> = Result<T, CouchDaoError>;

/// Failures that can occur while interacting with CouchDB.
#[derive(Debug, Error)]
pub enum CouchDaoError {
    /// Required environment variable is missing.
    #[error("missing CouchDB environment variable `{var}`")]
    MissingEnvVar {
        /// Variable name.
        var: &'static str,
    },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build CouchDB client")]
    ClientBuilder {
        /// HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// CouchDB returned an unexpected status code for a database operation.
    #[error("unexpected CouchDB database response status {status} for `{database}`")]
    DatabaseStatus {
        /// Database name.
        database: String,
        /// HTTP status returned.
        status: StatusCode,
    },
    /// A request to a document endpoint could not be sent.
    #[error("failed to send CouchDB request to `{path}`")]
    RequestSend {
        /// Request path.
        path: String,
        /// HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// CouchDB returned an unexpected status code for a document endpoint.
    #[error("unexpected CouchDB response status {status} for `{path}`")]
    RequestStatus {
        /// Request path.
        path: String,
        /// HTTP status returned.
        status: StatusCode,
    },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode CouchDB response for `{path}`")]
    DecodeResponse {
        /// Request path.
        path: String,
        /// HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// A record with the same identifier already exists.
    #[error("record `{id}` already exists in `{table}`")]
    Conflict {
        /// Affected table.
        table: Table,
        /// Record id.
        id: String,
    },
    /// Concurrent revisions kept winning over our update.
    #[error("gave up updating `{id}` in `{table}` after repeated revision conflicts")]
    RevisionConflict {
        /// Affected table.
        table: Table,
        /// Record id.
        id: String,
    },
    /// Stored or submitted record cannot be mapped to a CouchDB document.
    #[error("invalid CouchDB document in `{table}`: {message}")]
    InvalidDocument {
        /// Affected table.
        table: Table,
        /// What went wrong.
        message: String,
    },
}
