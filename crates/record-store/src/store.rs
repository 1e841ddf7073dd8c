//! The repository interface the custodian stores records through.

use async_trait::async_trait;
use common::record::{WriteId, WriteRecord};

use crate::error::{Result, StoreError};

/// Content-addressed, insert-only storage of write records.
///
/// Records are keyed by the SHA-256 digest of their ciphertext. Each key moves
/// from absent to present at most once; there is no update or delete.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store `record` under its digest and return the write id.
    ///
    /// Fails with `DigestMismatch` if the declared digest does not hash the
    /// ciphertext, and with `AlreadyExists` if the digest is already present.
    /// The existence check and the write are atomic, so of several concurrent
    /// puts of the same record exactly one succeeds.
    async fn put(&self, record: &WriteRecord) -> Result<WriteId>;

    /// Load the record stored under `id`.
    ///
    /// Fails with `NotFound` if absent and with `Corrupted` if the stored
    /// bytes no longer hash to `id`.
    async fn get(&self, id: &WriteId) -> Result<WriteRecord>;

    async fn contains(&self, id: &WriteId) -> Result<bool>;

    /// Number of stored records
    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Parse a hex write id as received from a caller and load its record.
    async fn get_by_hex(&self, id: &str) -> Result<WriteRecord> {
        let id: WriteId = id.parse()?;
        self.get(&id).await
    }

    /// Check the backend can serve requests.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// Validate a record for insertion and encode it.
pub(crate) fn encode_for_put(record: &WriteRecord) -> Result<(WriteId, Vec<u8>)> {
    let computed = WriteId::for_ciphertext(&record.ciphertext);
    if computed != record.digest {
        return Err(StoreError::DigestMismatch {
            declared: record.digest,
            computed,
        });
    }
    Ok((computed, record.to_bytes()?))
}

/// Decode stored bytes and confirm they still belong under `id`.
pub(crate) fn decode_stored(id: &WriteId, bytes: &[u8]) -> Result<WriteRecord> {
    let record = WriteRecord::from_bytes(bytes).map_err(|_| StoreError::Corrupted(*id))?;
    if record.digest != *id || !record.digest_matches() {
        return Err(StoreError::Corrupted(*id));
    }
    Ok(record)
}
