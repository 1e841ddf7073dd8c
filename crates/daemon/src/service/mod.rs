//! The custodian's typed write and read operations.
//!
//! [`CalypsoService`] is the one place requests are validated. It owns no
//! globals: the record store, the custodian and the protocol switches are
//! all injected at construction.

mod error;

use std::sync::Arc;

use common::crypto::{PublicKey, Signature};
use common::messages::{ReadReply, ReadRequest, WriteReply, WriteRequest};
use common::record::WriteId;
use record_store::{RecordStore, StoreError};
use serde::{Deserialize, Serialize};

use crate::custodian::Custodian;

pub use error::{ErrorKind, ServiceError};

/// Protocol switches for the write and read paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Require and check the reader key sealed inside each record
    pub bind_reader_identity: bool,
    /// Return the stored ciphertext and digest alongside the re-encrypted key
    pub return_ciphertext: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_reader_identity: true,
            return_ciphertext: false,
        }
    }
}

#[derive(Clone)]
pub struct CalypsoService {
    store: Arc<dyn RecordStore>,
    custodian: Arc<dyn Custodian>,
    config: ServiceConfig,
}

impl CalypsoService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        custodian: Arc<dyn Custodian>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            custodian,
            config,
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The authority public key clients wrap their symmetric keys to
    pub fn authority(&self) -> PublicKey {
        self.custodian.public_key()
    }

    /// Store a client-built record.
    pub async fn write(&self, request: WriteRequest) -> Result<WriteReply, ServiceError> {
        if self.config.bind_reader_identity && request.enc_reader_binding.is_none() {
            tracing::warn!(write_id = %request.digest, "rejected write: missing reader binding");
            return Err(ServiceError::MissingReaderBinding);
        }

        let write_id = self.store.put(&request).await?;
        tracing::info!(write_id = %write_id, "accepted write");
        Ok(WriteReply { write_id })
    }

    /// Authorize a read and re-encrypt the record key to its reader.
    ///
    /// The signature is checked before the custodian is involved; a request
    /// that fails verification never reaches re-encryption.
    pub async fn read(&self, request: ReadRequest) -> Result<ReadReply, ServiceError> {
        let write_id: WriteId = request
            .write_id
            .parse()
            .map_err(StoreError::from)?;
        let record = self.store.get(&write_id).await?;

        if record.digest != write_id || !record.digest_matches() {
            tracing::warn!(write_id = %write_id, "rejected read: digest mismatch");
            return Err(ServiceError::DigestMismatch(write_id));
        }

        let authorized = Signature::from_slice(&request.signature)
            .ok()
            .map(|signature| record.reader.verify(write_id.as_bytes(), &signature).is_ok())
            .unwrap_or(false);
        if !authorized {
            tracing::warn!(write_id = %write_id, "rejected read: bad signature");
            return Err(ServiceError::Unauthorized);
        }

        let reencrypted = self
            .custodian
            .reencrypt_for_reader(&record, self.config.bind_reader_identity)
            .map_err(|e| {
                tracing::warn!(write_id = %write_id, "rejected read: re-encryption failed");
                ServiceError::from(e)
            })?;

        tracing::info!(write_id = %write_id, "served read");
        let (ciphertext, digest) = if self.config.return_ciphertext {
            (Some(record.ciphertext), Some(record.digest))
        } else {
            (None, None)
        };
        Ok(ReadReply {
            k: reencrypted.k,
            c: reencrypted.c,
            ciphertext,
            digest,
        })
    }
}
