//! Shared fixtures for protocol integration tests
#![allow(dead_code)]

use common::crypto::{self, SecretKey};
use common::prelude::*;

/// A reader and an authority keypair
pub struct Parties {
    pub reader: SecretKey,
    pub authority: SecretKey,
}

pub fn parties() -> Parties {
    Parties {
        reader: SecretKey::generate().unwrap(),
        authority: SecretKey::generate().unwrap(),
    }
}

/// Write `payload` for the reader and have the authority re-encrypt its key
pub fn write_and_reencrypt(parties: &Parties, payload: &[u8]) -> (WriteRecord, Ciphertext) {
    let record = create_write_record(
        payload,
        &parties.reader.public(),
        &parties.authority.public(),
        true,
    )
    .unwrap();
    let reencrypted = crypto::reencrypt(
        &parties.authority,
        &parties.reader.public(),
        &record.wrapped_key(),
    )
    .unwrap();
    (record, reencrypted)
}
