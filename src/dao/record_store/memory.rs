//! In-process record store used by default and by the test-suite.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use dashmap::DashMap;
use futures::future::BoxFuture;
use indexmap::IndexMap;

use super::{Document, ListQuery, RecordStore, Table, document_id};
use crate::dao::storage::{StorageError, StorageResult};

/// Record store keeping every table in memory, in insertion order.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    tables: Arc<DashMap<Table, IndexMap<String, Document>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryRecordStore {
    /// Empty, online store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: while offline every operation fails as unavailable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> StorageResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(
                "in-memory store is offline".into(),
                io::Error::new(io::ErrorKind::NotConnected, "offline"),
            ));
        }
        Ok(())
    }

    fn list_now(&self, table: Table, query: &ListQuery) -> StorageResult<Vec<Document>> {
        self.ensure_online()?;
        let Some(rows) = self.tables.get(&table) else {
            return Ok(Vec::new());
        };
        Ok(query.apply(rows.values().cloned()))
    }

    fn get_now(&self, table: Table, id: &str) -> StorageResult<Option<Document>> {
        self.ensure_online()?;
        Ok(self
            .tables
            .get(&table)
            .and_then(|rows| rows.get(id).cloned()))
    }

    fn create_now(&self, table: Table, documents: Vec<Document>) -> StorageResult<Vec<Document>> {
        self.ensure_online()?;
        let ids = documents
            .iter()
            .map(|doc| document_id(table, doc))
            .collect::<StorageResult<Vec<_>>>()?;

        let mut rows = self.tables.entry(table).or_default();
        for (position, id) in ids.iter().enumerate() {
            if rows.contains_key(id) || ids[..position].contains(id) {
                return Err(StorageError::Duplicate {
                    table,
                    id: id.clone(),
                });
            }
        }

        for (id, doc) in ids.into_iter().zip(documents.iter()) {
            rows.insert(id, doc.clone());
        }
        Ok(documents)
    }

    fn update_now(
        &self,
        table: Table,
        id: &str,
        fields: Document,
    ) -> StorageResult<Option<Document>> {
        self.ensure_online()?;
        let mut rows = self.tables.entry(table).or_default();
        let Some(existing) = rows.get_mut(id) else {
            return Ok(None);
        };
        for (field, value) in fields {
            if field == super::ID_FIELD {
                continue;
            }
            existing.insert(field, value);
        }
        Ok(Some(existing.clone()))
    }
}

impl RecordStore for MemoryRecordStore {
    fn list(
        &self,
        table: Table,
        query: ListQuery,
    ) -> BoxFuture<'static, StorageResult<Vec<Document>>> {
        let store = self.clone();
        Box::pin(async move { store.list_now(table, &query) })
    }

    fn get(&self, table: Table, id: String) -> BoxFuture<'static, StorageResult<Option<Document>>> {
        let store = self.clone();
        Box::pin(async move { store.get_now(table, &id) })
    }

    fn create(
        &self,
        table: Table,
        document: Document,
    ) -> BoxFuture<'static, StorageResult<Document>> {
        let store = self.clone();
        Box::pin(async move {
            let mut created = store.create_now(table, vec![document])?;
            created
                .pop()
                .ok_or_else(|| StorageError::malformed(table, "create returned no record"))
        })
    }

    fn create_many(
        &self,
        table: Table,
        documents: Vec<Document>,
    ) -> BoxFuture<'static, StorageResult<Vec<Document>>> {
        let store = self.clone();
        Box::pin(async move { store.create_now(table, documents) })
    }

    fn update(
        &self,
        table: Table,
        id: String,
        fields: Document,
    ) -> BoxFuture<'static, StorageResult<Option<Document>>> {
        let store = self.clone();
        Box::pin(async move { store.update_now(table, &id, fields) })
    }

    fn ensure_tables(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_online()?;
            for table in Table::ALL {
                store.tables.entry(table).or_default();
            }
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_online() })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_online() })
    }
}
