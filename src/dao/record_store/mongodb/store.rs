use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document as BsonDocument, doc},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    convert::{bson_to_record, fields_to_bson, json_to_bson, record_to_bson},
    error::{MongoDaoError, MongoResult},
};
use crate::dao::{
    record_store::{Direction, Document, ID_FIELD, ListQuery, RecordStore, Table, document_id},
    storage::StorageResult,
};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Record store persisting each table as a MongoDB collection.
#[derive(Clone)]
pub struct MongoRecordStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    database: RwLock<Database>,
    config: MongoConfig,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = self.database.read().await.clone();
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (_client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        *self.database.write().await = database;
        Ok(())
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE
    )
}

impl MongoRecordStore {
    /// Establish a connection to MongoDB. Collections are prepared by `ensure_tables`.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (_client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        Ok(Self {
            inner: Arc::new(MongoInner {
                database: RwLock::new(database),
                config,
            }),
        })
    }

    async fn collection(&self, table: Table) -> Collection<BsonDocument> {
        let database = self.inner.database.read().await;
        database.collection::<BsonDocument>(table.name())
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        for table in Table::ALL {
            let collection = self.collection(table).await;
            let fields = table
                .lookup_fields()
                .iter()
                .copied()
                .chain(std::iter::once("created_at"));
            for field in fields {
                let index_name = format!("{}_{field}_idx", table.name());
                let index = IndexModel::builder()
                    .keys(doc! { field: 1 })
                    .options(IndexOptions::builder().name(Some(index_name.clone())).build())
                    .build();

                collection
                    .create_index(index)
                    .await
                    .map_err(|source| MongoDaoError::EnsureIndex {
                        table,
                        index: index_name,
                        source,
                    })?;
            }
        }
        Ok(())
    }

    async fn list(&self, table: Table, query: ListQuery) -> MongoResult<Vec<Document>> {
        let collection = self.collection(table).await;

        let mut filter = BsonDocument::new();
        for (field, value) in &query.filter {
            filter.insert(field.clone(), json_to_bson(value));
        }

        let mut find = collection.find(filter);
        if let Some(order) = &query.order_by {
            let direction = match order.direction {
                Direction::Asc => 1,
                Direction::Desc => -1,
            };
            find = find.sort(doc! { order.field.as_str(): direction });
        }
        if let Some(limit) = query.limit {
            find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let documents: Vec<BsonDocument> = find
            .await
            .map_err(|source| MongoDaoError::Read { table, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Read { table, source })?;

        Ok(documents.into_iter().map(bson_to_record).collect())
    }

    async fn get(&self, table: Table, id: String) -> MongoResult<Option<Document>> {
        let collection = self.collection(table).await;
        let found = collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|source| MongoDaoError::Read { table, source })?;
        Ok(found.map(bson_to_record))
    }

    async fn create(&self, table: Table, record: Document) -> MongoResult<Document> {
        let id = document_id(table, &record).map_err(|err| MongoDaoError::Malformed {
            table,
            message: err.to_string(),
        })?;
        let collection = self.collection(table).await;
        collection
            .insert_one(record_to_bson(&id, &record))
            .await
            .map_err(|source| {
                if is_duplicate_key(&source) {
                    MongoDaoError::DuplicateId {
                        table,
                        id: id.clone(),
                    }
                } else {
                    MongoDaoError::Write { table, source }
                }
            })?;
        Ok(record)
    }

    async fn create_many(&self, table: Table, records: Vec<Document>) -> MongoResult<Vec<Document>> {
        if records.is_empty() {
            return Ok(records);
        }

        let mut ids = Vec::with_capacity(records.len());
        for record in &records {
            let id = document_id(table, record).map_err(|err| MongoDaoError::Malformed {
                table,
                message: err.to_string(),
            })?;
            if ids.contains(&id) {
                return Err(MongoDaoError::DuplicateId { table, id });
            }
            ids.push(id);
        }

        let collection = self.collection(table).await;
        let existing = collection
            .find_one(doc! { "_id": { "$in": ids.iter().map(|id| Bson::String(id.clone())).collect::<Vec<_>>() } })
            .await
            .map_err(|source| MongoDaoError::Read { table, source })?;
        if let Some(existing) = existing {
            let id = existing.get_str("_id").unwrap_or_default().to_owned();
            return Err(MongoDaoError::DuplicateId { table, id });
        }

        let documents = ids
            .iter()
            .zip(records.iter())
            .map(|(id, record)| record_to_bson(id, record))
            .collect::<Vec<_>>();
        collection
            .insert_many(documents)
            .await
            .map_err(|source| MongoDaoError::Write { table, source })?;
        Ok(records)
    }

    async fn update(
        &self,
        table: Table,
        id: String,
        mut fields: Document,
    ) -> MongoResult<Option<Document>> {
        fields.remove(ID_FIELD);
        if fields.is_empty() {
            return self.get(table, id).await;
        }

        let collection = self.collection(table).await;
        let updated = collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields_to_bson(&fields) })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::Write { table, source })?;
        Ok(updated.map(bson_to_record))
    }
}

impl RecordStore for MongoRecordStore {
    fn list(
        &self,
        table: Table,
        query: ListQuery,
    ) -> BoxFuture<'static, StorageResult<Vec<Document>>> {
        let store = self.clone();
        Box::pin(async move { store.list(table, query).await.map_err(Into::into) })
    }

    fn get(&self, table: Table, id: String) -> BoxFuture<'static, StorageResult<Option<Document>>> {
        let store = self.clone();
        Box::pin(async move { store.get(table, id).await.map_err(Into::into) })
    }

    fn create(
        &self,
        table: Table,
        document: Document,
    ) -> BoxFuture<'static, StorageResult<Document>> {
        let store = self.clone();
        Box::pin(async move { store.create(table, document).await.map_err(Into::into) })
    }

    fn create_many(
        &self,
        table: Table,
        documents: Vec<Document>,
    ) -> BoxFuture<'static, StorageResult<Vec<Document>>> {
        let store = self.clone();
        Box::pin(async move { store.create_many(table, documents).await.map_err(Into::into) })
    }

    fn update(
        &self,
        table: Table,
        id: String,
        fields: Document,
    ) -> BoxFuture<'static, StorageResult<Option<Document>>> {
        let store = self.clone();
        Box::pin(async move { store.update(table, id, fields).await.map_err(Into::into) })
    }

    fn ensure_tables(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_indexes().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
