//! End-to-end protocol properties without a custodian service

mod common;

use ::common::crypto::{self, SymmetricKey};
use ::common::prelude::*;

#[test]
fn test_round_trip_across_payload_sizes() {
    let parties = common::parties();
    for len in [0usize, 1, 15, 16, 17, 1024, 64 * 1024] {
        let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        let (record, reencrypted) = common::write_and_reencrypt(&parties, &payload);
        let recovered = recover(&record.ciphertext, &parties.reader, &reencrypted).unwrap();
        assert_eq!(recovered, payload, "payload of {len} bytes");
    }
}

#[test]
fn test_write_id_is_digest_of_ciphertext() {
    let parties = common::parties();
    let (record, _) = common::write_and_reencrypt(&parties, b"On Wisconsin!");
    let id = record.write_id().to_string();
    assert_eq!(id.len(), 64);
    assert_eq!(id, WriteId::for_ciphertext(&record.ciphertext).to_string());
}

#[test]
fn test_tampered_ciphertext_fails_authentication() {
    let parties = common::parties();
    let (record, reencrypted) = common::write_and_reencrypt(&parties, b"On Wisconsin!");

    for bit in [0usize, 7, 8 * 5 + 3, record.ciphertext.len() * 8 - 1] {
        let mut tampered = record.ciphertext.clone();
        tampered[bit / 8] ^= 1 << (bit % 8);
        let err = recover(&tampered, &parties.reader, &reencrypted).unwrap_err();
        assert!(err.is_authentication_failure(), "bit {bit}: {err}");
    }
}

#[test]
fn test_authority_key_does_not_open_reencrypted_key() {
    let parties = common::parties();
    let (record, reencrypted) = common::write_and_reencrypt(&parties, b"On Wisconsin!");
    assert!(recover(&record.ciphertext, &parties.authority, &reencrypted).is_err());
}

#[test]
fn test_wrong_key_decrypt_never_yields_symmetric_key() {
    let parties = common::parties();
    let record = create_write_record(
        b"On Wisconsin!",
        &parties.reader.public(),
        &parties.authority.public(),
        false,
    )
    .unwrap();

    for _ in 0..16 {
        let wrong = SecretKey::generate().unwrap();
        // anything that decodes must still fail to open the payload
        if let Ok(bytes) = crypto::decrypt(&wrong, &record.wrapped_key()) {
            if let Ok(key) = SymmetricKey::from_slice(&bytes) {
                assert!(key.open(&record.ciphertext).is_err());
            }
        }
    }
}

#[test]
fn test_each_reencryption_is_fresh() {
    let parties = common::parties();
    let (record, first) = common::write_and_reencrypt(&parties, b"On Wisconsin!");
    let second = crypto::reencrypt(
        &parties.authority,
        &parties.reader.public(),
        &record.wrapped_key(),
    )
    .unwrap();

    assert_ne!(first, second);
    for reencrypted in [first, second] {
        assert_eq!(
            recover(&record.ciphertext, &parties.reader, &reencrypted).unwrap(),
            b"On Wisconsin!"
        );
    }
}
