//! Request and reply types exchanged between clients and the custodian

use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, hex::Hex, serde_as};

use crate::crypto::{Ciphertext, Point, PublicKey};
use crate::record::{WriteId, WriteRecord};

/// A write is submitted as the full record the client built
pub type WriteRequest = WriteRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReply {
    pub write_id: WriteId,
}

/// A reader's request for the key of a stored write.
///
/// `write_id` is kept as the caller sent it; it is validated by the
/// custodian, not at deserialization. `signature` covers the raw digest
/// bytes the id encodes.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRequest {
    pub write_id: String,
    #[serde_as(as = "Hex")]
    pub signature: Vec<u8>,
}

/// The symmetric key re-encrypted to the requesting reader.
///
/// `ciphertext` and `digest` are only set when the custodian is configured to
/// hand back the stored payload with the key.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadReply {
    pub k: Point,
    pub c: Point,
    #[serde_as(as = "Option<Base64>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ciphertext: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<WriteId>,
}

impl ReadReply {
    pub fn reencrypted_key(&self) -> Ciphertext {
        Ciphertext {
            k: self.k,
            c: self.c,
        }
    }
}

/// The custodian's public key, which clients encrypt write keys to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityInfo {
    pub public_key: PublicKey,
}
