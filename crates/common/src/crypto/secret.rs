//! Payload encryption using AES-128-GCM
//!
//! Every write gets its own random 128-bit `SymmetricKey`. The payload is
//! sealed under that key and only the key itself is ElGamal-encrypted for the
//! custodian, since a group element can only carry a few bytes.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Key, Nonce};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the AES-GCM nonce in bytes
pub const NONCE_SIZE: usize = 12;
/// Size of the symmetric key in bytes (128 bits)
pub const SYMMETRIC_KEY_SIZE: usize = 16;
/// Size of the AES-GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Errors that can occur during sealing/opening
///
/// `AuthenticationFailed` covers both a wrong key and a modified ciphertext.
#[derive(Debug, thiserror::Error)]
pub enum AeadError {
    #[error("invalid symmetric key: expected {SYMMETRIC_KEY_SIZE} bytes, got {0}")]
    KeyError(usize),
    #[error("failed to obtain randomness: {0}")]
    RngError(String),
    #[error("sealed data too short, expected at least {NONCE_SIZE} bytes")]
    TooShort,
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// A 128-bit symmetric key for payload encryption
///
/// The sealed format is: `ciphertext || auth_tag (16 bytes) || nonce (12 bytes)`.
/// A fresh random nonce is drawn for every call to [`SymmetricKey::seal`].
/// The key bytes are wiped when the value is dropped.
///
/// # Examples
///
/// ```ignore
/// let key = SymmetricKey::generate()?;
///
/// let sealed = key.seal(b"sensitive data")?;
/// let opened = key.open(&sealed)?;
/// assert_eq!(b"sensitive data", &opened[..]);
/// ```
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; SYMMETRIC_KEY_SIZE]);

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

impl From<[u8; SYMMETRIC_KEY_SIZE]> for SymmetricKey {
    fn from(bytes: [u8; SYMMETRIC_KEY_SIZE]) -> Self {
        SymmetricKey(bytes)
    }
}

impl SymmetricKey {
    /// Generate a new random key using the operating system RNG
    pub fn generate() -> Result<Self, AeadError> {
        let mut buff = [0; SYMMETRIC_KEY_SIZE];
        getrandom::getrandom(&mut buff).map_err(|e| AeadError::RngError(e.to_string()))?;
        let key = Self(buff);
        buff.zeroize();
        Ok(key)
    }

    /// Create a key from a byte slice
    ///
    /// # Errors
    ///
    /// Returns `KeyError` if the slice length is not exactly `SYMMETRIC_KEY_SIZE` bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, AeadError> {
        if data.len() != SYMMETRIC_KEY_SIZE {
            return Err(AeadError::KeyError(data.len()));
        }
        let mut buff = [0; SYMMETRIC_KEY_SIZE];
        buff.copy_from_slice(data);
        let key = Self(buff);
        buff.zeroize();
        Ok(key)
    }

    /// Get a reference to the key bytes
    pub fn bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

    fn cipher(&self) -> Aes128Gcm {
        Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(self.bytes()))
    }

    /// Seal data with AES-128-GCM
    ///
    /// # Errors
    ///
    /// Returns `RngError` if no nonce could be drawn from the system RNG.
    pub fn seal(&self, data: &[u8]) -> Result<Vec<u8>, AeadError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut nonce_bytes).map_err(|e| AeadError::RngError(e.to_string()))?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let mut out = self
            .cipher()
            .encrypt(nonce, data)
            .map_err(|_| AeadError::AuthenticationFailed)?;
        out.extend_from_slice(&nonce_bytes);
        Ok(out)
    }

    /// Open data sealed with [`SymmetricKey::seal`]
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Data is too short to contain a nonce
    /// - Authentication tag verification fails (wrong key or tampered data)
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, AeadError> {
        if sealed.len() < NONCE_SIZE {
            return Err(AeadError::TooShort);
        }

        let (ciphertext, nonce_bytes) = sealed.split_at(sealed.len() - NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);
        self.cipher()
            .decrypt(nonce, ciphertext)
            .map_err(|_| AeadError::AuthenticationFailed)
    }
}
