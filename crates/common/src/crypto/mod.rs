//! Cryptographic primitives for Calypso
//!
//! - **Identity & Authentication**: Ed25519 keypairs for readers and for the
//!   custodian authority. A reader signs the raw write ID to request access.
//! - **Payload Encryption**: AES-128-GCM with a fresh key per write and a
//!   fresh nonce per seal.
//! - **Key Custody**: ElGamal over the Ed25519 group. The per-write key is
//!   embedded into a point and encrypted to the authority, which later
//!   re-encrypts it to the bound reader without returning it in the clear.
//!
//! # Key Derivation
//!
//! The ElGamal private scalar is derived from the Ed25519 signing key, so the
//! verifying key bytes double as the ElGamal public point. A reader needs a
//! single keypair both to sign read requests and to recover payloads.

pub mod elgamal;
pub(crate) mod fixed_bytes;
mod keys;
mod secret;

pub use ed25519_dalek::Signature;
pub use elgamal::{Ciphertext, ElGamalError, Point, EMBED_LEN, POINT_SIZE};
pub use keys::{KeyError, PublicKey, SecretKey, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
pub use secret::{AeadError, SymmetricKey, NONCE_SIZE, SYMMETRIC_KEY_SIZE, TAG_SIZE};

/// Re-encrypt `ciphertext` from the holder of `secret_key` to `recipient`.
///
/// Wraps [`elgamal::reencrypt`] for callers outside this crate, which never
/// see the raw scalar behind a [`SecretKey`].
pub fn reencrypt(
    secret_key: &SecretKey,
    recipient: &PublicKey,
    ciphertext: &Ciphertext,
) -> Result<Ciphertext, ElGamalError> {
    let point = recipient
        .to_point()
        .map_err(|_| ElGamalError::InvalidPoint)?;
    elgamal::reencrypt(&secret_key.scalar(), &point, ciphertext)
}

/// Decrypt an ElGamal ciphertext addressed to `secret_key`.
pub fn decrypt(
    secret_key: &SecretKey,
    ciphertext: &Ciphertext,
) -> Result<zeroize::Zeroizing<Vec<u8>>, ElGamalError> {
    elgamal::decrypt(&secret_key.scalar(), ciphertext)
}
