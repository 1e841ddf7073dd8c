//! The custodian authority: sole holder of the secret key write records are
//! wrapped to.

use std::fmt;

use common::crypto::{self, elgamal, AeadError, Ciphertext, ElGamalError, KeyError};
use common::crypto::{PublicKey, SecretKey, SymmetricKey};
use common::record::WriteRecord;

/// A symmetric key re-encrypted to a record's reader
pub type ReencryptedKey = Ciphertext;

/// Errors raised while re-encrypting a record key.
///
/// Messages never include key material, and a wrong key is not told apart
/// from a corrupted record.
#[derive(Debug, thiserror::Error)]
pub enum CustodianError {
    #[error("reader binding does not match the record's reader")]
    ReaderMismatch,
    #[error("failed to unwrap record key: {0}")]
    ElGamal(#[from] ElGamalError),
    #[error("failed to open reader binding: {0}")]
    Aead(#[from] AeadError),
    #[error("invalid reader key: {0}")]
    Key(#[from] KeyError),
}

/// Holder of the authority secret.
///
/// Implementations unwrap a record's symmetric key and re-encrypt it to the
/// record's reader. They are only called once the reader has proven
/// possession of the reader key.
pub trait Custodian: Send + Sync {
    /// The key clients wrap their symmetric keys to
    fn public_key(&self) -> PublicKey;

    /// Re-encrypt `record`'s wrapped key to `record.reader`.
    ///
    /// With `bind_reader_identity` set, the reader key sealed inside the
    /// record must match `record.reader`; a record without a binding is a
    /// mismatch.
    fn reencrypt_for_reader(
        &self,
        record: &WriteRecord,
        bind_reader_identity: bool,
    ) -> Result<ReencryptedKey, CustodianError>;
}

/// The production custodian, owning the authority secret key in process.
pub struct Authority {
    secret: SecretKey,
}

impl fmt::Debug for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authority")
            .field("public_key", &self.secret.public().to_hex())
            .finish()
    }
}

impl Authority {
    pub fn new(secret: SecretKey) -> Self {
        Self { secret }
    }
}

impl Custodian for Authority {
    fn public_key(&self) -> PublicKey {
        self.secret.public()
    }

    fn reencrypt_for_reader(
        &self,
        record: &WriteRecord,
        bind_reader_identity: bool,
    ) -> Result<ReencryptedKey, CustodianError> {
        let reader = record.reader.to_point()?;
        let key_bytes = crypto::decrypt(&self.secret, &record.wrapped_key())?;

        if bind_reader_identity {
            let binding = record
                .enc_reader_binding
                .as_ref()
                .ok_or(CustodianError::ReaderMismatch)?;
            let key = SymmetricKey::from_slice(&key_bytes)?;
            // a binding sealed under another record's key is a mismatch too
            let bound_reader = key
                .open(binding)
                .map_err(|_| CustodianError::ReaderMismatch)?;
            if bound_reader != record.reader.to_bytes() {
                return Err(CustodianError::ReaderMismatch);
            }
        }

        let (reencrypted, remainder) = elgamal::encrypt(&reader, &key_bytes)?;
        if !remainder.is_empty() {
            return Err(ElGamalError::MessageTooLong(key_bytes.len()).into());
        }
        Ok(reencrypted)
    }
}

#[cfg(test)]
mod test {
    use common::client::{create_write_record, recover};

    use super::*;

    fn setup(bind: bool) -> (Authority, SecretKey, WriteRecord) {
        let authority = Authority::new(SecretKey::generate().unwrap());
        let reader = SecretKey::generate().unwrap();
        let record = create_write_record(
            b"On Wisconsin!",
            &reader.public(),
            &authority.public_key(),
            bind,
        )
        .unwrap();
        (authority, reader, record)
    }

    #[test]
    fn test_reencrypt_for_bound_reader() {
        let (authority, reader, record) = setup(true);
        let reencrypted = authority.reencrypt_for_reader(&record, true).unwrap();
        assert_eq!(
            recover(&record.ciphertext, &reader, &reencrypted).unwrap(),
            b"On Wisconsin!"
        );
    }

    #[test]
    fn test_unbound_record_allowed_without_binding_check() {
        let (authority, reader, record) = setup(false);
        let reencrypted = authority.reencrypt_for_reader(&record, false).unwrap();
        assert!(recover(&record.ciphertext, &reader, &reencrypted).is_ok());

        assert!(matches!(
            authority.reencrypt_for_reader(&record, true),
            Err(CustodianError::ReaderMismatch)
        ));
    }

    #[test]
    fn test_swapped_reader_is_mismatch() {
        let (authority, _, mut record) = setup(true);
        let intruder = SecretKey::generate().unwrap();
        record.reader = intruder.public();

        assert!(matches!(
            authority.reencrypt_for_reader(&record, true),
            Err(CustodianError::ReaderMismatch)
        ));
    }

    #[test]
    fn test_unopenable_binding_is_mismatch() {
        let (authority, _, mut record) = setup(true);
        for binding in [vec![0u8; 40], vec![0u8; 4]] {
            record.enc_reader_binding = Some(binding);
            assert!(matches!(
                authority.reencrypt_for_reader(&record, true),
                Err(CustodianError::ReaderMismatch)
            ));
        }
    }

    #[test]
    fn test_other_authority_cannot_unwrap() {
        let (_, _, record) = setup(true);
        let other = Authority::new(SecretKey::generate().unwrap());
        assert!(other.reencrypt_for_reader(&record, true).is_err());
    }

    #[test]
    fn test_debug_shows_only_public_key() {
        let secret = SecretKey::generate().unwrap();
        let secret_hex = secret.to_hex().to_string();
        let authority = Authority::new(secret);

        let debug = format!("{:?}", authority);
        assert!(debug.contains(&authority.public_key().to_hex()));
        assert!(!debug.contains(&secret_hex));
    }
}
