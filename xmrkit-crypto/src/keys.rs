//! Ed25519 key types and the group operations Monero needs.
//!
//! - [`PrivateKey`]: canonical scalar mod ℓ (zeroized on drop)
//! - [`PublicKey`]: curve point with its canonical 32-byte encoding
//!
//! The free functions are a thin adapter over `curve25519-dalek` so the rest
//! of the workspace never touches the curve library directly.

use std::fmt;
use std::hash::{Hash, Hasher};

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use xmrkit_core::constants::{KEY_SIZE, WIDE_REDUCTION_SIZE};
use xmrkit_core::error::{Result, XmrError};

// ═══════════════════════════════════════════════════════════════════════════════
// GROUP OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parses a canonical little-endian scalar (value < ℓ).
///
/// # Errors
/// Returns `InvalidKeyEncoding` for a wrong length or a non-canonical value.
pub fn scalar_from_canonical_bytes(bytes: &[u8]) -> Result<Scalar> {
    let arr = to_key_array(bytes)?;
    Option::<Scalar>::from(Scalar::from_canonical_bytes(arr))
        .ok_or_else(|| XmrError::InvalidKeyEncoding("scalar is not canonical".into()))
}

/// Parses a compressed Edwards point.
///
/// Only canonical encodings are accepted, so re-encoding the point always
/// yields the input bytes.
///
/// # Errors
/// Returns `InvalidKeyEncoding` for a wrong length, bytes that are not on the
/// curve, or a non-canonical encoding.
pub fn point_from_bytes(bytes: &[u8]) -> Result<EdwardsPoint> {
    let arr = to_key_array(bytes)?;
    let point = CompressedEdwardsY(arr)
        .decompress()
        .ok_or_else(|| XmrError::InvalidKeyEncoding("bytes are not a curve point".into()))?;

    if point.compress().to_bytes() != arr {
        return Err(XmrError::InvalidKeyEncoding(
            "non-canonical point encoding".into(),
        ));
    }

    Ok(point)
}

/// Computes `s·G`.
pub fn scalar_base_mult(scalar: &Scalar) -> EdwardsPoint {
    EdwardsPoint::mul_base(scalar)
}

/// Computes `s·P`.
pub fn scalar_mult(scalar: &Scalar, point: &EdwardsPoint) -> EdwardsPoint {
    scalar * point
}

/// Computes `P + Q`.
pub fn point_add(a: &EdwardsPoint, b: &EdwardsPoint) -> EdwardsPoint {
    a + b
}

/// Computes `8·P`.
pub fn mult_by_cofactor(point: &EdwardsPoint) -> EdwardsPoint {
    point.mul_by_cofactor()
}

fn to_key_array(bytes: &[u8]) -> Result<[u8; KEY_SIZE]> {
    bytes.try_into().map_err(|_| {
        XmrError::InvalidKeyEncoding(format!(
            "expected {} bytes, got {}",
            KEY_SIZE,
            bytes.len()
        ))
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRIVATE KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// Ed25519 private key (spend or view), a canonical scalar.
///
/// This key is sensitive and will be automatically zeroized when dropped.
/// Never expose this key in logs or error messages.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    scalar: Scalar,
}

impl PrivateKey {
    /// Creates a private key from its 32-byte canonical encoding.
    ///
    /// # Errors
    /// Returns `InvalidKeyEncoding` if the length is wrong or the scalar is
    /// not reduced mod ℓ.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            scalar: scalar_from_canonical_bytes(bytes)?,
        })
    }

    /// Creates a private key from hex.
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = hex::decode(s)?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Wraps an already reduced scalar.
    pub fn from_scalar(scalar: Scalar) -> Self {
        Self { scalar }
    }

    /// Generates a uniformly random private key from the OS CSPRNG.
    pub fn generate() -> Self {
        Self::generate_with_rng(&mut OsRng)
    }

    /// Generates a uniformly random private key from the given RNG.
    ///
    /// Draws 64 bytes and reduces them wide, so the result carries no
    /// modulo bias.
    pub fn generate_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut wide = [0u8; WIDE_REDUCTION_SIZE];
        rng.fill_bytes(&mut wide);
        let scalar = Scalar::from_bytes_mod_order_wide(&wide);
        wide.zeroize();
        Self { scalar }
    }

    /// Returns the underlying scalar.
    pub fn as_scalar(&self) -> &Scalar {
        &self.scalar
    }

    /// Returns the 32-byte canonical encoding.
    ///
    /// # Security
    /// Handle the returned bytes carefully - do not log or expose them.
    pub fn to_bytes(&self) -> [u8; KEY_SIZE] {
        self.scalar.to_bytes()
    }

    /// Returns the hex-encoded key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.scalar.as_bytes())
    }

    /// Derives the matching public key `k·G`.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_point(scalar_base_mult(&self.scalar))
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.scalar.ct_eq(&other.scalar).into()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never expose secret key content
        write!(f, "PrivateKey([REDACTED])")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// Ed25519 public key (spend, view, transaction or output key).
///
/// Keeps the decompressed point next to its canonical encoding so neither
/// needs recomputing.
#[derive(Clone, Copy)]
pub struct PublicKey {
    point: EdwardsPoint,
    bytes: [u8; KEY_SIZE],
}

impl PublicKey {
    /// Creates a public key from its 32-byte compressed encoding.
    ///
    /// # Errors
    /// Returns `InvalidKeyEncoding` if the bytes do not encode a curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_point(point_from_bytes(bytes)?))
    }

    /// Creates a public key from hex.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }

    /// Wraps a curve point.
    pub fn from_point(point: EdwardsPoint) -> Self {
        Self {
            point,
            bytes: point.compress().to_bytes(),
        }
    }

    /// Returns the curve point.
    pub fn as_point(&self) -> &EdwardsPoint {
        &self.point
    }

    /// Returns the compressed encoding.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Returns the hex-encoded key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Returns `self + other`.
    pub fn add_key(&self, other: &PublicKey) -> PublicKey {
        PublicKey::from_point(point_add(&self.point, &other.point))
    }

    /// Returns `k·self`.
    pub fn mul_scalar(&self, scalar: &Scalar) -> PublicKey {
        PublicKey::from_point(scalar_mult(scalar, &self.point))
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Serde implementation that uses hex encoding
impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
