//! Write record storage
//!
//! This crate provides the [`RecordStore`] repository the custodian persists
//! client write records through, and two backends for it.
//!
//! # Features
//!
//! - Content-addressed: records are keyed by the SHA-256 digest of their
//!   ciphertext, which doubles as the write id handed back to clients
//! - Insert-only: a digest can be written once; duplicates are rejected
//!   atomically
//! - Tamper detection at rest: every read re-hashes the stored ciphertext
//! - Backends: in-memory and SQLite (file-backed or in-memory)
//!
//! # Example
//!
//! ```rust,no_run
//! use record_store::{RecordStore, SqliteStore};
//! use std::path::Path;
//!
//! # async fn example(record: common::record::WriteRecord) -> Result<(), record_store::StoreError> {
//! let store = SqliteStore::new(Path::new("/tmp/calypso/db.sqlite")).await?;
//! let id = store.put(&record).await?;
//! assert_eq!(store.get(&id).await?, record);
//! # Ok(())
//! # }
//! ```

mod database;
mod error;
mod memory;
mod store;

pub use database::SqliteStore;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::RecordStore;
