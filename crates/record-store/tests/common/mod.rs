//! Shared fixtures for record store integration tests
#![allow(dead_code)]

use std::sync::Arc;

use common::client::create_write_record;
use common::crypto::SecretKey;
use common::record::WriteRecord;
use record_store::{MemoryStore, RecordStore, SqliteStore};
use tempfile::TempDir;

/// Build a bound record for `payload` with throwaway keys
pub fn record(payload: &[u8]) -> WriteRecord {
    let reader = SecretKey::generate().unwrap().public();
    let authority = SecretKey::generate().unwrap().public();
    create_write_record(payload, &reader, &authority, true).unwrap()
}

/// Every backend under test, with the temp dir backing the file database
pub async fn backends() -> (Vec<(&'static str, Arc<dyn RecordStore>)>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let file = SqliteStore::new(&temp_dir.path().join("db.sqlite"))
        .await
        .unwrap();
    let backends: Vec<(&'static str, Arc<dyn RecordStore>)> = vec![
        ("memory", Arc::new(MemoryStore::new())),
        ("sqlite-memory", Arc::new(SqliteStore::in_memory().await.unwrap())),
        ("sqlite-file", Arc::new(file)),
    ];
    (backends, temp_dir)
}
