/// Entity definitions shared across layers.
pub mod models;
/// Generic record store and its backends.
pub mod record_store;
/// Typed repositories over the record store.
pub mod repository;
/// Storage error types.
pub mod storage;
