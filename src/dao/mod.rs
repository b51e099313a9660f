/// League relations storage and retrieval operations.
pub mod league_store;
/// Gateway row definitions.
pub mod models;
/// Storage abstraction layer for gateway operations.
pub mod storage;
