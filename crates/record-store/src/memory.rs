//! In-process record store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::record::{WriteId, WriteRecord};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::{decode_stored, encode_for_put, RecordStore};

/// A record store held entirely in memory.
///
/// Records are kept in their encoded form, so reads go through the same
/// decode-and-verify path as the SQLite backend. Cloning shares the map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<WriteId, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put(&self, record: &WriteRecord) -> Result<WriteId> {
        let (id, bytes) = encode_for_put(record)?;

        let mut records = self.records.write();
        if records.contains_key(&id) {
            debug!(write_id = %id, "rejecting duplicate record");
            return Err(StoreError::AlreadyExists(id));
        }
        records.insert(id, bytes);

        debug!(write_id = %id, "stored record");
        Ok(id)
    }

    async fn get(&self, id: &WriteId) -> Result<WriteRecord> {
        let records = self.records.read();
        let bytes = records.get(id).ok_or(StoreError::NotFound(*id))?;
        decode_stored(id, bytes)
    }

    async fn contains(&self, id: &WriteId) -> Result<bool> {
        Ok(self.records.read().contains_key(id))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}
