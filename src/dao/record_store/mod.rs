/// CouchDB backend.
#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;
/// MongoDB backend.
#[cfg(feature = "mongo-store")]
pub mod mongodb;
mod query;

use std::{fmt, sync::Arc};

use futures::future::BoxFuture;
use serde_json::{Map, Value};

use crate::dao::storage::{StorageError, StorageResult};

pub use self::query::{Direction, ListQuery, OrderBy, compare_values};

/// A stored record as a JSON object keyed by its persisted field names.
pub type Document = Map<String, Value>;

/// Field carrying the record identifier in every document.
pub const ID_FIELD: &str = "id";

/// Tables known to the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Teams table.
    Teams,
    /// Players table.
    Players,
    /// Games table.
    Games,
    /// Player stat lines table.
    PlayerStats,
}

impl Table {
    /// Every table prepared by [`RecordStore::ensure_tables`].
    pub const ALL: [Table; 4] = [
        Table::Teams,
        Table::Players,
        Table::Games,
        Table::PlayerStats,
    ];

    /// Persisted table / collection name.
    pub fn name(self) -> &'static str {
        match self {
            Table::Teams => "teams",
            Table::Players => "players",
            Table::Games => "games",
            Table::PlayerStats => "player_stats",
        }
    }

    /// Secondary fields looked up by exact match, indexed where the backend supports it.
    pub fn lookup_fields(self) -> &'static [&'static str] {
        match self {
            Table::Teams => &["user_id"],
            Table::Players => &["team_id", "user_id"],
            Table::Games => &["user_id"],
            Table::PlayerStats => &["game_id", "player_id", "user_id"],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Abstraction over the hosted record store holding teams, players, games and stats.
pub trait RecordStore: Send + Sync {
    /// Records of `table` matching `query`.
    fn list(&self, table: Table, query: ListQuery)
    -> BoxFuture<'static, StorageResult<Vec<Document>>>;
    /// Record by id, `None` when unknown.
    fn get(&self, table: Table, id: String) -> BoxFuture<'static, StorageResult<Option<Document>>>;
    /// Insert a record; a taken id yields [`StorageError::Duplicate`].
    fn create(&self, table: Table, document: Document)
    -> BoxFuture<'static, StorageResult<Document>>;
    /// Insert several records and return them as stored.
    fn create_many(
        &self,
        table: Table,
        documents: Vec<Document>,
    ) -> BoxFuture<'static, StorageResult<Vec<Document>>>;
    /// Apply a partial update and return the stored record, `None` when the id is unknown.
    fn update(
        &self,
        table: Table,
        id: String,
        fields: Document,
    ) -> BoxFuture<'static, StorageResult<Option<Document>>>;
    /// Prepare every table and its lookup indexes.
    fn ensure_tables(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap round-trip to the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Re-establish the connection after failed health checks.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Extract the identifier of a document, rejecting records without one.
pub fn document_id(table: Table, document: &Document) -> StorageResult<String> {
    match document.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(StorageError::malformed(table, "record has no string `id`")),
    }
}

/// Backend selected through the `STORE_BACKEND` environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process store, lost on restart.
    Memory,
    /// MongoDB via `MONGO_URI`.
    #[cfg(feature = "mongo-store")]
    Mongo,
    /// CouchDB via `COUCH_BASE_URL`.
    #[cfg(feature = "couch-store")]
    Couch,
}

impl StoreBackend {
    /// Read the backend choice from the environment, defaulting to the in-memory store.
    pub fn from_env() -> Result<Self, String> {
        let raw = std::env::var("STORE_BACKEND").unwrap_or_default();
        Self::parse(&raw)
    }

    fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "memory" => Ok(StoreBackend::Memory),
            #[cfg(feature = "mongo-store")]
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            #[cfg(feature = "couch-store")]
            "couch" | "couchdb" => Ok(StoreBackend::Couch),
            other => Err(format!("unsupported STORE_BACKEND `{other}`")),
        }
    }
}

/// Connect the selected backend.
pub async fn connect(backend: &StoreBackend) -> StorageResult<Arc<dyn RecordStore>> {
    match backend {
        StoreBackend::Memory => Ok(Arc::new(memory::MemoryRecordStore::new())),
        #[cfg(feature = "mongo-store")]
        StoreBackend::Mongo => {
            let config = self::mongodb::MongoConfig::from_env().await?;
            let store = self::mongodb::MongoRecordStore::connect(config).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "couch-store")]
        StoreBackend::Couch => {
            let config = self::couchdb::CouchConfig::from_env()?;
            let store = self::couchdb::CouchRecordStore::connect(config).await?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn backend_parsing_defaults_to_memory() {
        assert_eq!(StoreBackend::parse("").unwrap(), StoreBackend::Memory);
        assert_eq!(StoreBackend::parse(" Memory ").unwrap(), StoreBackend::Memory);
        assert!(StoreBackend::parse("sqlite").is_err());
    }

    #[test]
    fn document_id_requires_a_string() {
        let mut doc = Document::new();
        assert!(document_id(Table::Teams, &doc).is_err());
        doc.insert(ID_FIELD.into(), json!(7));
        assert!(document_id(Table::Teams, &doc).is_err());
        doc.insert(ID_FIELD.into(), json!("abc"));
        assert_eq!(document_id(Table::Teams, &doc).unwrap(), "abc");
    }
}
