use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use http::request::Parts;
use record_store::RecordStore;

use crate::ServiceState;

/// What a ready service reports about its record store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreReport {
    pub records: usize,
}

#[async_trait]
pub trait DataSource {
    /// Check that the record store answers queries.
    async fn is_ready(&self) -> Result<StoreReport, DataSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("one or more dependent services aren't available")]
    DependencyFailure,
}

pub type DynDataSource = Arc<dyn DataSource + Send + Sync>;

pub struct StateDataSource(DynDataSource);

impl Debug for StateDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateDataSource").finish()
    }
}

impl StateDataSource {
    pub fn new(dds: DynDataSource) -> Self {
        Self(dds)
    }
}

impl Deref for StateDataSource {
    type Target = DynDataSource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Readiness of the record store behind the service
struct StoreSource {
    store: Arc<dyn RecordStore>,
}

#[async_trait]
impl DataSource for StoreSource {
    async fn is_ready(&self) -> Result<StoreReport, DataSourceError> {
        let check = async {
            self.store.health_check().await?;
            self.store.len().await
        };
        match check.await {
            Ok(records) => Ok(StoreReport { records }),
            Err(e) => {
                tracing::error!("record store health check failed: {}", e);
                Err(DataSourceError::DependencyFailure)
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<ServiceState> for StateDataSource {
    type Rejection = ();

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        Ok(StateDataSource(Arc::new(StoreSource {
            store: state.service().store().clone(),
        })))
    }
}
