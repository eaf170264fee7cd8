//! Keccak-256 and hash-to-scalar.
//!
//! Monero hashes with the original Keccak submission (pre-standard padding),
//! so `keccak256` here is NOT SHA3-256 and the two must never be swapped.
//!
//! ## Hash to scalar
//!
//! ```text
//! Hs(x) = (keccak256(x) || 0^32) mod ℓ
//! ```

use curve25519_dalek::scalar::Scalar;
use sha3::{Digest, Keccak256};

use xmrkit_core::constants::{CHECKSUM_SIZE, KECCAK256_SIZE, WIDE_REDUCTION_SIZE};

// ═══════════════════════════════════════════════════════════════════════════════
// KECCAK256
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes the legacy Keccak-256 digest.
pub fn keccak256(input: &[u8]) -> [u8; KECCAK256_SIZE] {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// Computes Keccak-256 over the concatenation of `parts`.
///
/// Equivalent to hashing the joined buffer, without allocating it.
pub fn keccak256_concat(parts: &[&[u8]]) -> [u8; KECCAK256_SIZE] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Returns the 4-byte address checksum of `payload`.
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let digest = keccak256(payload);
    let mut out = [0u8; CHECKSUM_SIZE];
    out.copy_from_slice(&digest[..CHECKSUM_SIZE]);
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// HASH TO SCALAR
// ═══════════════════════════════════════════════════════════════════════════════

/// Reduces a 32-byte digest to a scalar.
///
/// The digest is zero-extended to 64 bytes and reduced wide, which maps every
/// digest to its value mod ℓ.
pub fn hash_to_scalar(digest: &[u8; KECCAK256_SIZE]) -> Scalar {
    let mut wide = [0u8; WIDE_REDUCTION_SIZE];
    wide[..KECCAK256_SIZE].copy_from_slice(digest);
    Scalar::from_bytes_mod_order_wide(&wide)
}

/// Computes `Hs(parts[0] || parts[1] || ...)`.
pub fn keccak_to_scalar(parts: &[&[u8]]) -> Scalar {
    hash_to_scalar(&keccak256_concat(parts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_vectors() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            hex::encode(keccak256(b"hello")),
            "1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_keccak_is_not_sha3() {
        use sha3::Sha3_256;

        let sha3: [u8; 32] = Sha3_256::digest(b"hello").into();
        assert_ne!(keccak256(b"hello"), sha3);
    }

    #[test]
    fn test_concat_matches_joined() {
        let joined = keccak256(b"view_tagabc\x01");
        let parts = keccak256_concat(&[b"view_tag", b"abc", &[0x01]]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn test_hash_to_scalar_matches_mod_order() {
        let digest = keccak256(b"xmrkit");
        assert_eq!(hash_to_scalar(&digest), Scalar::from_bytes_mod_order(digest));
    }

    #[test]
    fn test_hash_to_scalar_reduces() {
        // 2^256 - 1 is far above ℓ and must come back canonical
        let scalar = hash_to_scalar(&[0xff; 32]);
        let bytes = scalar.to_bytes();
        assert!(bool::from(Scalar::from_canonical_bytes(bytes).is_some()));
        assert_ne!(bytes, [0xff; 32]);
    }

    #[test]
    fn test_checksum_prefix() {
        let payload = b"payload";
        assert_eq!(checksum(payload), keccak256(payload)[..4]);
    }
}
