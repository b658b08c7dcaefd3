use std::{marker::PhantomData, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::dao::{
    models::{GameEntity, PlayerEntity, PlayerStatEntity, TeamEntity},
    record_store::{Document, ListQuery, RecordStore, Table},
    storage::{StorageError, StorageResult},
};

/// Entity persisted in one record-store table.
pub trait Record: Serialize + DeserializeOwned + Send + 'static {
    /// Table holding this record type.
    const TABLE: Table;

    /// Identifier of the user owning the record.
    fn owner(&self) -> &str;
}

impl Record for TeamEntity {
    const TABLE: Table = Table::Teams;

    fn owner(&self) -> &str {
        &self.user_id
    }
}

impl Record for PlayerEntity {
    const TABLE: Table = Table::Players;

    fn owner(&self) -> &str {
        &self.user_id
    }
}

impl Record for GameEntity {
    const TABLE: Table = Table::Games;

    fn owner(&self) -> &str {
        &self.user_id
    }
}

impl Record for PlayerStatEntity {
    const TABLE: Table = Table::PlayerStats;

    fn owner(&self) -> &str {
        &self.user_id
    }
}

/// Typed access to a single table on top of the untyped [`RecordStore`].
pub struct Repository<T> {
    store: Arc<dyn RecordStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Repository<T> {
    /// Repository over `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Records matching `query`.
    pub async fn list(&self, query: ListQuery) -> StorageResult<Vec<T>> {
        let documents = self.store.list(T::TABLE, query).await?;
        documents.into_iter().map(decode).collect()
    }

    /// Record by id, whoever owns it.
    pub async fn get(&self, id: &str) -> StorageResult<Option<T>> {
        let document = self.store.get(T::TABLE, id.to_owned()).await?;
        document.map(decode).transpose()
    }

    /// Fetch a record, hiding records that belong to another user.
    pub async fn get_owned(&self, id: &str, user_id: &str) -> StorageResult<Option<T>> {
        Ok(self
            .get(id)
            .await?
            .filter(|record| record.owner() == user_id))
    }

    /// Insert one record; fails on a duplicate id.
    pub async fn create(&self, record: &T) -> StorageResult<T> {
        let stored = self.store.create(T::TABLE, encode(record)?).await?;
        decode(stored)
    }

    /// Insert several records in one call.
    pub async fn create_many(&self, records: &[T]) -> StorageResult<Vec<T>> {
        let documents = records.iter().map(encode).collect::<StorageResult<Vec<_>>>()?;
        let stored = self.store.create_many(T::TABLE, documents).await?;
        stored.into_iter().map(decode).collect()
    }

    /// Apply a partial update and return the canonical stored record.
    pub async fn update(&self, id: &str, fields: &impl Serialize) -> StorageResult<Option<T>> {
        let fields = encode_with(T::TABLE, fields)?;
        let stored = self.store.update(T::TABLE, id.to_owned(), fields).await?;
        stored.map(decode).transpose()
    }
}

fn encode<T: Record>(record: &T) -> StorageResult<Document> {
    encode_with(T::TABLE, record)
}

fn encode_with(table: Table, value: &impl Serialize) -> StorageResult<Document> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StorageError::malformed(table, "record is not a JSON object")),
        Err(err) => Err(StorageError::malformed(table, err.to_string())),
    }
}

fn decode<T: Record>(document: Document) -> StorageResult<T> {
    serde_json::from_value(Value::Object(document))
        .map_err(|err| StorageError::malformed(T::TABLE, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{
        models::{GamePatch, GameStatus, Timestamp},
        record_store::memory::MemoryRecordStore,
    };

    fn team(id: &str, user_id: &str) -> TeamEntity {
        TeamEntity {
            id: id.into(),
            name: format!("Team {id}"),
            color: "#3B82F6".into(),
            sport: Some("basketball".into()),
            user_id: user_id.into(),
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn owned_lookup_hides_foreign_records() {
        let repo = Repository::<TeamEntity>::new(Arc::new(MemoryRecordStore::new()));
        repo.create(&team("t1", "alice")).await.unwrap();

        assert!(repo.get_owned("t1", "alice").await.unwrap().is_some());
        assert!(repo.get_owned("t1", "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn patch_update_returns_canonical_record() {
        let repo = Repository::<GameEntity>::new(Arc::new(MemoryRecordStore::new()));
        let game = GameEntity {
            id: "g1".into(),
            user_id: "alice".into(),
            sport_id: "basketball".into(),
            team1_id: "t1".into(),
            team2_id: "t2".into(),
            team1_score: 0,
            team2_score: 0,
            team1_fouls: 0,
            team2_fouls: 0,
            game_time: 0,
            shot_clock_time: 24,
            is_game_clock_running: false,
            is_shot_clock_running: false,
            current_period: 1,
            game_status: GameStatus::Active,
            created_at: Timestamp::now(),
        };
        repo.create(&game).await.unwrap();

        let patch = GamePatch {
            team2_score: Some(2),
            game_status: Some(GameStatus::Paused),
            ..GamePatch::default()
        };
        let updated = repo.update("g1", &patch).await.unwrap().unwrap();
        assert_eq!(updated.team2_score, 2);
        assert_eq!(updated.game_status, GameStatus::Paused);
        assert_eq!(updated.shot_clock_time, 24);
    }
}
