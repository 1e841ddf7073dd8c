/**
 * Client-side protocol steps:
 *  building write records, signing read
 *  requests and recovering payloads.
 */
pub mod client;
/**
 * Cryptographic types and operations.
 *  - Public and Private key implementations
 *  - Symmetric payload encryption
 *  - ElGamal key wrapping and re-encryption
 */
pub mod crypto;
/**
 * Wire types shared by the custodian
 *  service and its clients.
 */
pub mod messages;
/**
 * Content-addressed write records and
 *  the identifiers they are stored under.
 */
pub mod record;

pub mod prelude {
    pub use crate::client::{create_write_record, recover, sign_read, RecoveryError};
    pub use crate::crypto::{Ciphertext, Point, PublicKey, SecretKey};
    pub use crate::messages::{ReadReply, ReadRequest, WriteReply, WriteRequest};
    pub use crate::record::{WriteId, WriteRecord};
}
