//! ElGamal encryption over the Ed25519 group
//!
//! Short messages are embedded directly into a group element: byte 0 of the
//! compressed point holds the message length, the next `EMBED_LEN` bytes hold
//! the message and the remaining bytes are random. Candidates are drawn until
//! one decodes to a point in the prime-order subgroup.
//!
//! A ciphertext is the pair `(K, C) = (k*G, k*PK + M)` for a fresh ephemeral
//! scalar `k`. Re-encryption recovers `M` with the current holder's scalar and
//! encrypts it again under a new public key; the recovered bytes never leave
//! [`reencrypt`].

use std::fmt;
use std::ops::{Add, Sub};

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

use super::fixed_bytes;

/// Size of a compressed group element in bytes
pub const POINT_SIZE: usize = 32;
/// Maximum number of bytes that fit in a single embedded point
pub const EMBED_LEN: usize = 29;
/// Upper bound on embedding attempts; each succeeds with probability ~1/16
const MAX_EMBED_ATTEMPTS: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum ElGamalError {
    /// The decrypted point does not carry embedded data. Raised for both a
    /// wrong scalar and a corrupted ciphertext.
    #[error("invalid point")]
    InvalidPoint,
    #[error("message of {0} bytes exceeds embedding capacity of {EMBED_LEN} bytes")]
    MessageTooLong(usize),
    #[error("failed to obtain randomness: {0}")]
    Rng(String),
}

/// A group element in canonical compressed encoding
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Point(EdwardsPoint);

impl From<EdwardsPoint> for Point {
    fn from(point: EdwardsPoint) -> Self {
        Point(point)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point(self.0 - rhs.0)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({})", hex::encode(self.to_bytes()))
    }
}

impl TryFrom<[u8; POINT_SIZE]> for Point {
    type Error = ElGamalError;
    fn try_from(bytes: [u8; POINT_SIZE]) -> Result<Self, Self::Error> {
        CompressedEdwardsY(bytes)
            .decompress()
            .map(Point)
            .ok_or(ElGamalError::InvalidPoint)
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        fixed_bytes::serialize(&self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = fixed_bytes::deserialize::<D, POINT_SIZE>(deserializer)?;
        Point::try_from(bytes).map_err(serde::de::Error::custom)
    }
}

impl Point {
    /// `scalar * G` for the Ed25519 basepoint `G`
    pub(crate) fn mul_base(scalar: &Scalar) -> Self {
        Point(EdwardsPoint::mul_base(scalar))
    }

    pub(crate) fn mul(&self, scalar: &Scalar) -> Self {
        Point(self.0 * scalar)
    }

    /// Canonical 32-byte encoding
    pub fn to_bytes(&self) -> [u8; POINT_SIZE] {
        self.0.compress().to_bytes()
    }

    /// Embed up to [`EMBED_LEN`] bytes of `data` into a point.
    ///
    /// Returns the point and whatever suffix of `data` did not fit.
    pub fn embed(data: &[u8]) -> Result<(Self, &[u8]), ElGamalError> {
        let len = data.len().min(EMBED_LEN);
        let (head, remainder) = data.split_at(len);

        let mut candidate = Zeroizing::new([0u8; POINT_SIZE]);
        for _ in 0..MAX_EMBED_ATTEMPTS {
            getrandom::getrandom(&mut candidate[..])
                .map_err(|e| ElGamalError::Rng(e.to_string()))?;
            candidate[0] = len as u8;
            candidate[1..1 + len].copy_from_slice(head);

            let Some(point) = CompressedEdwardsY(*candidate).decompress() else {
                continue;
            };
            // reject non-canonical encodings and points outside the subgroup
            if point.compress().as_bytes() != &*candidate || !point.is_torsion_free() {
                continue;
            }
            return Ok((Point(point), remainder));
        }

        Err(ElGamalError::Rng(
            "exhausted attempts to embed data into a point".to_string(),
        ))
    }

    /// Extract bytes previously embedded with [`Point::embed`].
    pub fn data(&self) -> Result<Zeroizing<Vec<u8>>, ElGamalError> {
        let bytes = Zeroizing::new(self.to_bytes());
        let len = bytes[0] as usize;
        if len > EMBED_LEN {
            return Err(ElGamalError::InvalidPoint);
        }
        Ok(Zeroizing::new(bytes[1..1 + len].to_vec()))
    }
}

/// An ElGamal ciphertext `(K, C)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    /// Ephemeral Diffie-Hellman public key `k*G`
    pub k: Point,
    /// Message blinded with the shared secret, `k*PK + M`
    pub c: Point,
}

fn random_scalar() -> Result<Zeroizing<Scalar>, ElGamalError> {
    let mut wide = Zeroizing::new([0u8; 64]);
    getrandom::getrandom(&mut wide[..]).map_err(|e| ElGamalError::Rng(e.to_string()))?;
    Ok(Zeroizing::new(Scalar::from_bytes_mod_order_wide(&wide)))
}

/// Encrypt as much of `msg` as fits in one point under `pk`.
///
/// Returns the ciphertext and the unembedded suffix of `msg`. Callers that
/// need the whole message encrypted must check the remainder is empty.
pub fn encrypt<'a>(pk: &Point, msg: &'a [u8]) -> Result<(Ciphertext, &'a [u8]), ElGamalError> {
    let (m, remainder) = Point::embed(msg)?;
    let k = random_scalar()?;
    let shared = pk.mul(&k);
    let ciphertext = Ciphertext {
        k: Point::mul_base(&k),
        c: shared + m,
    };
    Ok((ciphertext, remainder))
}

/// Recover the embedded bytes of `ciphertext` with the private scalar `sk`.
///
/// # Errors
///
/// Returns `InvalidPoint` if the result does not decode as embedded data.
pub fn decrypt(sk: &Scalar, ciphertext: &Ciphertext) -> Result<Zeroizing<Vec<u8>>, ElGamalError> {
    let shared = ciphertext.k.mul(sk);
    let m = ciphertext.c - shared;
    m.data()
}

/// Transform a ciphertext under the public key of `sk_from` into one under `pk_to`.
///
/// The plaintext is held in a zeroizing buffer for the duration of the call
/// and is never returned.
pub fn reencrypt(
    sk_from: &Scalar,
    pk_to: &Point,
    ciphertext: &Ciphertext,
) -> Result<Ciphertext, ElGamalError> {
    let plaintext = decrypt(sk_from, ciphertext)?;
    let (reencrypted, remainder) = encrypt(pk_to, &plaintext)?;
    debug_assert!(remainder.is_empty());
    Ok(reencrypted)
}

#[cfg(test)]
mod test {
    use super::*;

    fn keypair() -> (Zeroizing<Scalar>, Point) {
        let sk = random_scalar().unwrap();
        let pk = Point::mul_base(&sk);
        (sk, pk)
    }

    #[test]
    fn test_embed_and_extract() {
        for len in [0usize, 1, 16, EMBED_LEN] {
            let data: Vec<u8> = (0..len as u8).collect();
            let (point, remainder) = Point::embed(&data).unwrap();
            assert!(remainder.is_empty());
            assert_eq!(point.data().unwrap().as_slice(), data.as_slice());
        }
    }

    #[test]
    fn test_embed_returns_remainder() {
        let data = [7u8; EMBED_LEN + 5];
        let (point, remainder) = Point::embed(&data).unwrap();
        assert_eq!(remainder, &[7u8; 5]);
        assert_eq!(point.data().unwrap().len(), EMBED_LEN);
    }

    #[test]
    fn test_encrypt_decrypt() {
        let (sk, pk) = keypair();
        let msg = b"sixteen byte key";

        let (ciphertext, remainder) = encrypt(&pk, msg).unwrap();
        assert!(remainder.is_empty());
        assert_eq!(decrypt(&sk, &ciphertext).unwrap().as_slice(), msg);
    }

    #[test]
    fn test_encryption_is_randomized() {
        let (_, pk) = keypair();
        let (first, _) = encrypt(&pk, b"same").unwrap();
        let (second, _) = encrypt(&pk, b"same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_reencrypt() {
        let (sk_a, pk_a) = keypair();
        let (sk_b, pk_b) = keypair();
        let msg = b"sixteen byte key";

        let (ciphertext, _) = encrypt(&pk_a, msg).unwrap();
        let reencrypted = reencrypt(&sk_a, &pk_b, &ciphertext).unwrap();

        assert_ne!(reencrypted, ciphertext);
        assert_eq!(decrypt(&sk_b, &reencrypted).unwrap().as_slice(), msg);
    }

    #[test]
    fn test_wrong_scalar_never_yields_plaintext() {
        let (_, pk) = keypair();
        let msg = b"sixteen byte key";
        let (ciphertext, _) = encrypt(&pk, msg).unwrap();

        for _ in 0..32 {
            let (wrong, _) = keypair();
            match decrypt(&wrong, &ciphertext) {
                Err(ElGamalError::InvalidPoint) => {}
                Ok(bytes) => assert_ne!(bytes.as_slice(), msg),
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    }

    #[test]
    fn test_point_serde() {
        let (_, pk) = keypair();
        let json = serde_json::to_string(&pk).unwrap();
        assert_eq!(serde_json::from_str::<Point>(&json).unwrap(), pk);

        let bin = bincode::serialize(&pk).unwrap();
        assert_eq!(bincode::deserialize::<Point>(&bin).unwrap(), pk);
    }
}
