use std::sync::Arc;

use common::crypto::{KeyError, SecretKey};
use record_store::{MemoryStore, RecordStore, SqliteStore, StoreError};

use crate::custodian::{Authority, Custodian};
use crate::service::{CalypsoService, ServiceConfig};
use crate::service_config::Config;

/// Main service state, shared with every request handler
#[derive(Clone)]
pub struct State {
    service: CalypsoService,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup record store
        let store: Arc<dyn RecordStore> = match config.sqlite_path {
            Some(ref path) => {
                tracing::info!("Database path: {}", path.display());
                Arc::new(SqliteStore::new(path).await?)
            }
            // otherwise just set up an in-memory database
            None => {
                tracing::info!("Database: in-memory");
                Arc::new(SqliteStore::in_memory().await?)
            }
        };

        // 2. Setup authority
        let secret = match config.authority_secret.clone() {
            Some(secret) => secret,
            None => {
                tracing::warn!("no authority key configured, generating an ephemeral one");
                SecretKey::generate()?
            }
        };
        let authority = Authority::new(secret);
        tracing::info!("Authority public key: {}", authority.public_key());

        Ok(Self::new(CalypsoService::new(
            store,
            Arc::new(authority),
            config.protocol,
        )))
    }

    /// State over an in-memory store, for tests and embedding
    pub fn ephemeral(custodian: Arc<dyn Custodian>, config: ServiceConfig) -> Self {
        Self::new(CalypsoService::new(
            Arc::new(MemoryStore::new()),
            custodian,
            config,
        ))
    }

    pub fn new(service: CalypsoService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &CalypsoService {
        &self.service
    }
}

impl AsRef<CalypsoService> for State {
    fn as_ref(&self) -> &CalypsoService {
        &self.service
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Record store setup error: {0}")]
    Store(#[from] StoreError),
    #[error("Authority key error: {0}")]
    Key(#[from] KeyError),
}
