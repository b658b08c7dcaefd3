use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::dao::{
    record_store::{Document, ID_FIELD, ListQuery, RecordStore, Table, document_id},
    storage::StorageResult,
};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{AllDocsResponse, END_SUFFIX, doc_id, from_couch_body, table_prefix, to_couch_body},
};

const MAX_UPDATE_ATTEMPTS: usize = 3;

/// Record store keeping every table in one CouchDB database, namespaced by id prefix.
#[derive(Clone)]
pub struct CouchRecordStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

enum PutOutcome {
    Stored,
    Conflict,
}

impl CouchRecordStore {
    /// Establish a connection to CouchDB and ensure the database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let base_url = Arc::<str>::from(config.base_url.trim_end_matches('/'));
        let database = Arc::<str>::from(config.database);
        let auth = config
            .username
            .zip(config.password)
            .map(|(u, p)| (Arc::<str>::from(u), Arc::<str>::from(p)));

        let store = Self {
            client,
            base_url,
            database,
            auth,
        };

        store.ensure_database().await?;
        Ok(store)
    }

    fn database_request(&self, method: Method) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, self.database);
        let builder = self.client.request(method, url);
        match &self.auth {
            Some((user, pass)) => builder.basic_auth(user.as_ref(), Some(pass.as_ref())),
            None => builder,
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}/{}", self.base_url, self.database, path);
        let builder = self.client.request(method, url);
        match &self.auth {
            Some((user, pass)) => builder.basic_auth(user.as_ref(), Some(pass.as_ref())),
            None => builder,
        }
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let database = self.database.to_string();
        let response = self
            .database_request(Method::GET)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: database.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                debug!(database = %database, "creating CouchDB database");
                let create = self
                    .database_request(Method::PUT)
                    .send()
                    .await
                    .map_err(|source| CouchDaoError::RequestSend {
                        path: database.clone(),
                        source,
                    })?;
                // 412 means another instance created it first.
                if create.status().is_success() || create.status() == StatusCode::PRECONDITION_FAILED {
                    Ok(())
                } else {
                    Err(CouchDaoError::DatabaseStatus {
                        database,
                        status: create.status(),
                    })
                }
            }
            other => Err(CouchDaoError::DatabaseStatus {
                database,
                status: other,
            }),
        }
    }

    async fn get_document(&self, doc_id: &str) -> CouchResult<Option<(Document, Option<String>)>> {
        let response = self
            .request(Method::GET, doc_id)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.json::<Document>().await.map_err(|source| {
                    CouchDaoError::DecodeResponse {
                        path: doc_id.to_string(),
                        source,
                    }
                })?;
                Ok(Some(from_couch_body(body)))
            }
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn put_document(&self, doc_id: &str, body: &Document) -> CouchResult<PutOutcome> {
        let response = self
            .request(Method::PUT, doc_id)
            .json(body)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::CONFLICT => Ok(PutOutcome::Conflict),
            status if status.is_success() => Ok(PutOutcome::Stored),
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    /// Documents of one table in id order.
    async fn table_documents(&self, table: Table) -> CouchResult<Vec<Document>> {
        const ALL_DOCS: &str = "_all_docs";
        let prefix = table_prefix(table);
        let query = [
            ("include_docs", "true".to_string()),
            ("startkey", format!("\"{}\"", prefix)),
            ("endkey", format!("\"{}{}\"", prefix, END_SUFFIX)),
        ];

        let response = self
            .request(Method::GET, ALL_DOCS)
            .query(&query)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: ALL_DOCS.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: ALL_DOCS.to_string(),
                status: response.status(),
            });
        }

        let payload = response.json::<AllDocsResponse>().await.map_err(|source| {
            CouchDaoError::DecodeResponse {
                path: ALL_DOCS.to_string(),
                source,
            }
        })?;

        Ok(payload
            .rows
            .into_iter()
            .filter_map(|row| match row.doc {
                Some(Value::Object(body)) => Some(from_couch_body(body).0),
                _ => None,
            })
            .collect())
    }

    fn record_id(table: Table, record: &Document) -> CouchResult<String> {
        document_id(table, record).map_err(|err| CouchDaoError::InvalidDocument {
            table,
            message: err.to_string(),
        })
    }

    async fn create(&self, table: Table, record: Document) -> CouchResult<Document> {
        let id = Self::record_id(table, &record)?;
        let couch_id = doc_id(table, &id);
        match self
            .put_document(&couch_id, &to_couch_body(table, &id, &record, None))
            .await?
        {
            PutOutcome::Stored => Ok(record),
            PutOutcome::Conflict => Err(CouchDaoError::Conflict { table, id }),
        }
    }

    async fn create_many(&self, table: Table, records: Vec<Document>) -> CouchResult<Vec<Document>> {
        let mut ids = Vec::with_capacity(records.len());
        for record in &records {
            let id = Self::record_id(table, record)?;
            let taken = ids.contains(&id) || self.get_document(&doc_id(table, &id)).await?.is_some();
            if taken {
                return Err(CouchDaoError::Conflict { table, id });
            }
            ids.push(id);
        }

        for (id, record) in ids.into_iter().zip(records.iter()) {
            let couch_id = doc_id(table, &id);
            if let PutOutcome::Conflict = self
                .put_document(&couch_id, &to_couch_body(table, &id, record, None))
                .await?
            {
                return Err(CouchDaoError::Conflict { table, id });
            }
        }
        Ok(records)
    }

    /// Read-merge-write with the current revision, retrying when another writer won.
    async fn update(
        &self,
        table: Table,
        id: String,
        mut fields: Document,
    ) -> CouchResult<Option<Document>> {
        fields.remove(ID_FIELD);
        let couch_id = doc_id(table, &id);

        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let Some((mut record, rev)) = self.get_document(&couch_id).await? else {
                return Ok(None);
            };
            for (field, value) in &fields {
                record.insert(field.clone(), value.clone());
            }

            let body = to_couch_body(table, &id, &record, rev.as_deref());
            match self.put_document(&couch_id, &body).await? {
                PutOutcome::Stored => return Ok(Some(record)),
                PutOutcome::Conflict => {
                    debug!(table = %table, id = %id, "CouchDB revision conflict, retrying update");
                }
            }
        }

        Err(CouchDaoError::RevisionConflict { table, id })
    }

    async fn ping(&self) -> CouchResult<()> {
        let response = self
            .database_request(Method::GET)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: self.database.to_string(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: self.database.to_string(),
                status: response.status(),
            })
        }
    }
}

impl RecordStore for CouchRecordStore {
    fn list(
        &self,
        table: Table,
        query: ListQuery,
    ) -> BoxFuture<'static, StorageResult<Vec<Document>>> {
        let store = self.clone();
        Box::pin(async move {
            let documents = store.table_documents(table).await?;
            Ok(query.apply(documents))
        })
    }

    fn get(&self, table: Table, id: String) -> BoxFuture<'static, StorageResult<Option<Document>>> {
        let store = self.clone();
        Box::pin(async move {
            let found = store.get_document(&doc_id(table, &id)).await?;
            Ok(found.map(|(record, _rev)| record))
        })
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
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}
