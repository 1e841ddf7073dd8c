//! Behavior every record store backend must share

mod common;

use ::common::record::WriteId;
use futures::future::join_all;
use record_store::{RecordStore, SqliteStore, StoreError};

#[tokio::test]
async fn test_put_returns_hex_digest() {
    let (backends, _temp) = common::backends().await;
    for (name, store) in backends {
        let record = common::record(b"On Wisconsin!");
        let id = store.put(&record).await.unwrap();

        let hex = id.to_string();
        assert_eq!(hex.len(), 64, "{name}");
        assert_eq!(id, WriteId::for_ciphertext(&record.ciphertext), "{name}");
        assert_eq!(store.get_by_hex(&hex).await.unwrap(), record, "{name}");
    }
}

#[tokio::test]
async fn test_duplicate_put_already_exists() {
    let (backends, _temp) = common::backends().await;
    for (name, store) in backends {
        let record = common::record(b"On Wisconsin!");
        store.put(&record).await.unwrap();

        let err = store.put(&record).await.unwrap_err();
        assert!(
            matches!(err, StoreError::AlreadyExists(id) if id == record.digest),
            "{name}: {err}"
        );
        assert_eq!(store.len().await.unwrap(), 1, "{name}");
    }
}

#[tokio::test]
async fn test_digest_mismatch_rejected_before_storage() {
    let (backends, _temp) = common::backends().await;
    for (name, store) in backends {
        let mut record = common::record(b"payload");
        record.ciphertext.push(0);

        let err = store.put(&record).await.unwrap_err();
        assert!(matches!(err, StoreError::DigestMismatch { .. }), "{name}: {err}");
        assert!(store.is_empty().await.unwrap(), "{name}");
        assert!(!store.contains(&record.digest).await.unwrap(), "{name}");
    }
}

#[tokio::test]
async fn test_missing_and_malformed_ids() {
    let (backends, _temp) = common::backends().await;
    for (name, store) in backends {
        let absent = WriteId::for_ciphertext(b"never stored");
        assert!(
            matches!(store.get(&absent).await, Err(StoreError::NotFound(id)) if id == absent),
            "{name}"
        );

        for bad in ["", "xyz", "abcd", "zz".repeat(32).as_str()] {
            assert!(
                matches!(store.get_by_hex(bad).await, Err(StoreError::MalformedID(_))),
                "{name}: {bad:?}"
            );
        }
    }
}

#[tokio::test]
async fn test_concurrent_duplicate_puts_have_one_winner() {
    let (backends, _temp) = common::backends().await;
    for (name, store) in backends {
        let record = common::record(b"raced");

        let attempts = (0..16).map(|_| {
            let store = store.clone();
            let record = record.clone();
            tokio::spawn(async move { store.put(&record).await })
        });
        let results = join_all(attempts).await;

        let mut won = 0;
        for result in results {
            match result.unwrap() {
                Ok(id) => {
                    assert_eq!(id, record.digest, "{name}");
                    won += 1;
                }
                Err(StoreError::AlreadyExists(_)) => {}
                Err(err) => panic!("{name}: unexpected error {err}"),
            }
        }
        assert_eq!(won, 1, "{name}");
        assert_eq!(store.len().await.unwrap(), 1, "{name}");
    }
}

#[tokio::test]
async fn test_sqlite_persists_across_reopen() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("db.sqlite");
    let record = common::record(b"durable");

    let id = {
        let store = SqliteStore::new(&path).await.unwrap();
        store.put(&record).await.unwrap()
    };

    let reopened = SqliteStore::new(&path).await.unwrap();
    assert_eq!(reopened.get(&id).await.unwrap(), record);
    assert!(matches!(
        reopened.put(&record).await,
        Err(StoreError::AlreadyExists(_))
    ));
}
