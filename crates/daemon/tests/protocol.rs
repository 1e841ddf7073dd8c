mod common;

use ::common::client::{create_write_record, recover, sign_read};
use ::common::crypto::SecretKey;
use calypso_daemon::service::ErrorKind;
use calypso_daemon::{ServiceConfig, ServiceError};
use record_store::StoreError;

use crate::common::service;

#[tokio::test]
async fn test_on_wisconsin_round_trip() {
    let (service, custodian) = service(ServiceConfig::default());
    let reader = SecretKey::generate().unwrap();

    let record = create_write_record(
        b"On Wisconsin!",
        &reader.public(),
        &service.authority(),
        true,
    )
    .unwrap();
    let reply = service.write(record.clone()).await.unwrap();

    let id = reply.write_id.to_string();
    assert_eq!(id.len(), 64);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

    let read = service
        .read(sign_read(&reply.write_id, &reader))
        .await
        .unwrap();
    assert!(read.ciphertext.is_none());
    assert_eq!(
        recover(&record.ciphertext, &reader, &read.reencrypted_key()).unwrap(),
        b"On Wisconsin!"
    );
    assert_eq!(custodian.calls(), 1);

    assert!(matches!(
        service.write(record).await,
        Err(ServiceError::Store(StoreError::AlreadyExists(existing))) if existing == reply.write_id
    ));
}

#[tokio::test]
async fn test_wrong_reader_never_reaches_custodian() {
    let (service, custodian) = service(ServiceConfig::default());
    let reader = SecretKey::generate().unwrap();
    let intruder = SecretKey::generate().unwrap();

    let record =
        create_write_record(b"payload", &reader.public(), &service.authority(), true).unwrap();
    let reply = service.write(record).await.unwrap();

    assert!(matches!(
        service.read(sign_read(&reply.write_id, &intruder)).await,
        Err(ServiceError::Unauthorized)
    ));

    // signature over a different write id
    let other = ::common::record::WriteId::for_ciphertext(b"other");
    let mut request = sign_read(&other, &reader);
    request.write_id = reply.write_id.to_string();
    assert!(matches!(
        service.read(request).await,
        Err(ServiceError::Unauthorized)
    ));

    let mut request = sign_read(&reply.write_id, &reader);
    request.signature = vec![0; 64];
    assert!(matches!(
        service.read(request).await,
        Err(ServiceError::Unauthorized)
    ));

    assert_eq!(custodian.calls(), 0);
}

#[tokio::test]
async fn test_swapped_reader_is_rejected() {
    let (service, custodian) = service(ServiceConfig::default());
    let reader = SecretKey::generate().unwrap();
    let intruder = SecretKey::generate().unwrap();

    let mut record =
        create_write_record(b"payload", &reader.public(), &service.authority(), true).unwrap();
    record.reader = intruder.public();
    let reply = service.write(record).await.unwrap();

    let err = service
        .read(sign_read(&reply.write_id, &intruder))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ReaderMismatch));
    assert_eq!(custodian.calls(), 1);
}

#[tokio::test]
async fn test_swapped_reader_and_binding_is_rejected() {
    let (service, custodian) = service(ServiceConfig::default());
    let reader = SecretKey::generate().unwrap();
    let intruder = SecretKey::generate().unwrap();

    let mut record =
        create_write_record(b"payload", &reader.public(), &service.authority(), true).unwrap();
    let own =
        create_write_record(b"mine", &intruder.public(), &service.authority(), true).unwrap();
    record.reader = intruder.public();
    record.enc_reader_binding = own.enc_reader_binding;
    let reply = service.write(record).await.unwrap();

    let err = service
        .read(sign_read(&reply.write_id, &intruder))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ReaderMismatch));
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert_eq!(custodian.calls(), 1);
}

#[tokio::test]
async fn test_garbage_binding_is_rejected_not_internal() {
    let (service, _) = service(ServiceConfig::default());
    let reader = SecretKey::generate().unwrap();

    let mut record =
        create_write_record(b"payload", &reader.public(), &service.authority(), true).unwrap();
    record.enc_reader_binding = Some(vec![0x5a; 40]);
    let reply = service.write(record).await.unwrap();

    let err = service
        .read(sign_read(&reply.write_id, &reader))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ReaderMismatch));
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_swapped_reader_passes_without_binding_check() {
    let (service, _) = service(ServiceConfig {
        bind_reader_identity: false,
        return_ciphertext: true,
    });
    let reader = SecretKey::generate().unwrap();
    let intruder = SecretKey::generate().unwrap();

    let mut record =
        create_write_record(b"payload", &reader.public(), &service.authority(), false).unwrap();
    record.reader = intruder.public();
    let reply = service.write(record).await.unwrap();

    let read = service
        .read(sign_read(&reply.write_id, &intruder))
        .await
        .unwrap();
    let ciphertext = read.ciphertext.clone().unwrap();
    assert_eq!(
        recover(&ciphertext, &intruder, &read.reencrypted_key()).unwrap(),
        b"payload"
    );
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let (service, custodian) = service(ServiceConfig::default());
    let reader = SecretKey::generate().unwrap();

    let missing = ::common::record::WriteId::for_ciphertext(b"never stored");
    assert!(matches!(
        service.read(sign_read(&missing, &reader)).await,
        Err(ServiceError::Store(StoreError::NotFound(_)))
    ));

    for bad in ["not-hex".to_string(), format!(" {} ", missing)] {
        let mut request = sign_read(&missing, &reader);
        request.write_id = bad;
        assert!(matches!(
            service.read(request).await,
            Err(ServiceError::Store(StoreError::MalformedID(_)))
        ));
    }
    assert_eq!(custodian.calls(), 0);
}

#[tokio::test]
async fn test_forged_digest_is_rejected_on_write() {
    let (service, _) = service(ServiceConfig::default());
    let reader = SecretKey::generate().unwrap();

    let mut record =
        create_write_record(b"payload", &reader.public(), &service.authority(), true).unwrap();
    record.digest = ::common::record::WriteId::for_ciphertext(b"something else");
    assert!(matches!(
        service.write(record).await,
        Err(ServiceError::Store(StoreError::DigestMismatch { .. }))
    ));
    assert!(service.store().is_empty().await.unwrap());
}

#[tokio::test]
async fn test_each_read_is_freshly_reencrypted() {
    let (service, custodian) = service(ServiceConfig::default());
    let reader = SecretKey::generate().unwrap();
    let record =
        create_write_record(b"payload", &reader.public(), &service.authority(), true).unwrap();
    let reply = service.write(record.clone()).await.unwrap();

    let first = service
        .read(sign_read(&reply.write_id, &reader))
        .await
        .unwrap();
    let second = service
        .read(sign_read(&reply.write_id, &reader))
        .await
        .unwrap();
    assert_ne!(first.reencrypted_key(), second.reencrypted_key());
    for read in [first, second] {
        assert_eq!(
            recover(&record.ciphertext, &reader, &read.reencrypted_key()).unwrap(),
            b"payload"
        );
    }
    assert_eq!(custodian.calls(), 2);
}
