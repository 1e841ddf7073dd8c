//! Client-side halves of the write and read protocol
//!
//! A writer seals its payload under a fresh symmetric key and wraps that key
//! for the custodian. A reader signs the write id, receives the key
//! re-encrypted to its own public key, and opens the payload locally.

use crate::crypto::{self, elgamal, Ciphertext, ElGamalError, PublicKey, SecretKey, SymmetricKey};
use crate::messages::ReadRequest;
use crate::record::{WriteId, WriteRecord};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("aead error: {0}")]
    Aead(#[from] crypto::AeadError),
    #[error("elgamal error: {0}")]
    ElGamal(#[from] ElGamalError),
    #[error("invalid key: {0}")]
    Key(#[from] crypto::KeyError),
}

/// Failure to turn a re-encrypted key and ciphertext back into plaintext.
///
/// Covers a wrong reader key, a corrupted reply and a modified ciphertext
/// alike. The cause is kept for local diagnostics only.
#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    #[error("recovery failed")]
    RecoveryFailed(#[source] anyhow::Error),
}

impl RecoveryError {
    fn failed(err: impl Into<anyhow::Error>) -> Self {
        RecoveryError::RecoveryFailed(err.into())
    }

    /// Whether the payload failed AEAD authentication, as opposed to the
    /// key failing to decrypt at all.
    pub fn is_authentication_failure(&self) -> bool {
        let RecoveryError::RecoveryFailed(err) = self;
        matches!(
            err.downcast_ref::<crypto::AeadError>(),
            Some(crypto::AeadError::AuthenticationFailed)
        )
    }
}

/// Build a record for `payload` readable only by `reader`.
///
/// A fresh symmetric key seals the payload and is ElGamal-encrypted to
/// `authority`. With `bind_reader` set, the reader's public key is also
/// sealed under the symmetric key so the custodian can check that the
/// record's `reader` field was not swapped after the fact.
pub fn create_write_record(
    payload: &[u8],
    reader: &PublicKey,
    authority: &PublicKey,
    bind_reader: bool,
) -> Result<WriteRecord, ClientError> {
    let key = SymmetricKey::generate()?;
    let ciphertext = key.seal(payload)?;

    let authority_point = authority.to_point()?;
    let (wrapped, remainder) = elgamal::encrypt(&authority_point, key.bytes())?;
    if !remainder.is_empty() {
        return Err(ElGamalError::MessageTooLong(key.bytes().len()).into());
    }

    let enc_reader_binding = if bind_reader {
        Some(key.seal(&reader.to_bytes())?)
    } else {
        None
    };

    let digest = WriteId::for_ciphertext(&ciphertext);
    tracing::debug!(write_id = %digest, len = ciphertext.len(), "built write record");

    Ok(WriteRecord {
        digest,
        ciphertext,
        k: wrapped.k,
        c: wrapped.c,
        reader: *reader,
        enc_reader_binding,
    })
}

/// Sign a read request for `write_id` with the reader's key
pub fn sign_read(write_id: &WriteId, reader: &SecretKey) -> ReadRequest {
    let signature = reader.sign(write_id.as_bytes());
    ReadRequest {
        write_id: write_id.to_hex(),
        signature: signature.to_bytes().to_vec(),
    }
}

/// Recover the plaintext of `ciphertext` from a key re-encrypted to `reader`.
pub fn recover(
    ciphertext: &[u8],
    reader: &SecretKey,
    reencrypted: &Ciphertext,
) -> Result<Vec<u8>, RecoveryError> {
    let key_bytes = crypto::decrypt(reader, reencrypted).map_err(RecoveryError::failed)?;
    let key = SymmetricKey::from_slice(&key_bytes).map_err(RecoveryError::failed)?;
    key.open(ciphertext).map_err(RecoveryError::failed)
}
