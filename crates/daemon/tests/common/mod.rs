//! Shared fixtures for custodian integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use calypso_daemon::custodian::ReencryptedKey;
use calypso_daemon::{Authority, CalypsoService, Custodian, CustodianError, ServiceConfig};
use calypso_daemon::ServiceState;
use common::crypto::{PublicKey, SecretKey};
use common::record::WriteRecord;
use record_store::MemoryStore;

/// A custodian that counts how often it was asked to re-encrypt
pub struct CountingCustodian {
    inner: Authority,
    calls: AtomicUsize,
}

impl CountingCustodian {
    pub fn new() -> Self {
        Self {
            inner: Authority::new(SecretKey::generate().unwrap()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Custodian for CountingCustodian {
    fn public_key(&self) -> PublicKey {
        self.inner.public_key()
    }

    fn reencrypt_for_reader(
        &self,
        record: &WriteRecord,
        bind_reader_identity: bool,
    ) -> Result<ReencryptedKey, CustodianError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.reencrypt_for_reader(record, bind_reader_identity)
    }
}

/// A service over an in-memory store, returning the custodian for inspection
pub fn service(config: ServiceConfig) -> (CalypsoService, Arc<CountingCustodian>) {
    let custodian = Arc::new(CountingCustodian::new());
    let service = CalypsoService::new(Arc::new(MemoryStore::new()), custodian.clone(), config);
    (service, custodian)
}

pub fn state(config: ServiceConfig) -> (ServiceState, Arc<CountingCustodian>) {
    let (service, custodian) = service(config);
    (ServiceState::new(service), custodian)
}
