//! Write records and their content-derived identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{base64::Base64, serde_as, Bytes, IfIsHumanReadable};
use sha2::{Digest, Sha256};

use crate::crypto::{fixed_bytes, Ciphertext, Point, PublicKey};

/// Size of a SHA-256 digest in bytes
pub const DIGEST_SIZE: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("malformed write id: {0}")]
    MalformedID(String),
    #[error("record serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// SHA-256 of `data`
pub fn digest(data: &[u8]) -> [u8; DIGEST_SIZE] {
    let mut out = [0u8; DIGEST_SIZE];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// Identifier of a stored write: the SHA-256 digest of its ciphertext.
///
/// Displays and parses as 64 lowercase hex characters. The raw digest bytes,
/// not the hex string, are what a reader signs to request access.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WriteId([u8; DIGEST_SIZE]);

impl WriteId {
    /// The write id a ciphertext will be stored under
    pub fn for_ciphertext(ciphertext: &[u8]) -> Self {
        WriteId(digest(ciphertext))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; DIGEST_SIZE]> for WriteId {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        WriteId(bytes)
    }
}

impl TryFrom<&[u8]> for WriteId {
    type Error = RecordError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; DIGEST_SIZE] = bytes.try_into().map_err(|_| {
            RecordError::MalformedID(format!(
                "expected {} bytes, got {}",
                DIGEST_SIZE,
                bytes.len()
            ))
        })?;
        Ok(WriteId(bytes))
    }
}

impl FromStr for WriteId {
    type Err = RecordError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != DIGEST_SIZE * 2 {
            return Err(RecordError::MalformedID(format!(
                "expected {} hex characters, got {}",
                DIGEST_SIZE * 2,
                s.len()
            )));
        }
        let mut bytes = [0u8; DIGEST_SIZE];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| RecordError::MalformedID(e.to_string()))?;
        Ok(WriteId(bytes))
    }
}

impl fmt::Display for WriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for WriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WriteId({})", self.to_hex())
    }
}

impl Serialize for WriteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        fixed_bytes::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for WriteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        fixed_bytes::deserialize::<D, DIGEST_SIZE>(deserializer).map(WriteId)
    }
}

/// A client-built record as submitted to and persisted by the custodian.
///
/// `(k, c)` is the per-write symmetric key ElGamal-encrypted to the
/// authority. `reader` is the only key allowed to read the record back, and
/// `enc_reader_binding`, when present, is that same key sealed under the
/// symmetric key so the custodian can detect a swapped `reader` field.
///
/// Records are immutable once built. The stored form is the bincode encoding
/// from [`WriteRecord::to_bytes`].
#[serde_as]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteRecord {
    #[serde_as(as = "IfIsHumanReadable<Base64, Bytes>")]
    pub ciphertext: Vec<u8>,
    pub digest: WriteId,
    pub k: Point,
    pub c: Point,
    pub reader: PublicKey,
    #[serde_as(as = "Option<IfIsHumanReadable<Base64, Bytes>>")]
    pub enc_reader_binding: Option<Vec<u8>>,
}

impl fmt::Debug for WriteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteRecord")
            .field("digest", &self.digest)
            .field("ciphertext_len", &self.ciphertext.len())
            .field("reader", &self.reader.to_hex())
            .field("bound", &self.enc_reader_binding.is_some())
            .finish()
    }
}

impl WriteRecord {
    pub fn write_id(&self) -> WriteId {
        self.digest
    }

    /// The ElGamal-wrapped symmetric key
    pub fn wrapped_key(&self) -> Ciphertext {
        Ciphertext {
            k: self.k,
            c: self.c,
        }
    }

    /// Whether the declared digest matches the ciphertext
    pub fn digest_matches(&self) -> bool {
        WriteId::for_ciphertext(&self.ciphertext) == self.digest
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
