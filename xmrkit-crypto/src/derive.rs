//! Key derivations for primary keys, subaddresses and stealth outputs.
//!
//! ## Output derivation
//!
//! ```text
//! S  = 8·v·R                      (receiver: view key v, tx key R)
//!    = 8·r·V                      (sender: tx secret r, view key V)
//! Si = Hs(S || index)
//! P  = Si·G + B                   (one-time output key, spend key B)
//! amount = enc ⊕ keccak256("amount" || Si)[..len]
//! ```
//!
//! ## Subaddress derivation
//!
//! ```text
//! m  = Hs("SubAddr\0" || v || LE32(major) || LE32(minor))
//! D  = m·G + B
//! C  = v·D
//! ```

use curve25519_dalek::scalar::Scalar;
use zeroize::{Zeroize, ZeroizeOnDrop};

use xmrkit_core::constants::{
    AMOUNT_PREFIX, KEY_SIZE, MAX_ENCRYPTED_AMOUNT_SIZE, SUBADDRESS_PREFIX,
};
use xmrkit_core::error::{Result, XmrError};

use crate::hash::{hash_to_scalar, keccak256, keccak256_concat, keccak_to_scalar};
use crate::keys::{mult_by_cofactor, scalar_base_mult, scalar_mult, PrivateKey, PublicKey};
use crate::view_tag::encode_output_index;

// ═══════════════════════════════════════════════════════════════════════════════
// PRIMARY KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives a public key from a private key (`k·G`).
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    private.public_key()
}

/// Derives the private view key from the private spend key.
///
/// ```text
/// v = Hs(keccak256(s))
/// ```
///
/// This is how wallets restored from a seed obtain their view key.
pub fn private_view_from_private_spend(spend: &PrivateKey) -> PrivateKey {
    let mut spend_bytes = spend.to_bytes();
    let view = hash_to_scalar(&keccak256(&spend_bytes));
    spend_bytes.zeroize();
    PrivateKey::from_scalar(view)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SHARED SECRET
// ═══════════════════════════════════════════════════════════════════════════════

/// The cofactor-cleared ECDH point `8·k·P`, compressed.
///
/// Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    bytes: [u8; KEY_SIZE],
}

impl SharedSecret {
    /// Returns the compressed point.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedSecret([REDACTED])")
    }
}

/// Computes the shared secret `8·k·P`.
///
/// The receiver passes its private view key and the transaction public key;
/// the sender passes the transaction secret key and the recipient's public
/// view key. Both arrive at the same point.
pub fn shared_secret(private: &PrivateKey, public: &PublicKey) -> SharedSecret {
    let point = mult_by_cofactor(&scalar_mult(private.as_scalar(), public.as_point()));
    SharedSecret {
        bytes: point.compress().to_bytes(),
    }
}

/// Computes the per-output scalar `Si = Hs(S || index)`.
pub fn derivation_scalar(shared_secret: &SharedSecret, index: u64) -> Scalar {
    let index_bytes = encode_output_index(index);
    keccak_to_scalar(&[shared_secret.as_bytes(), &index_bytes])
}

/// Computes the one-time output key `Si·G + B`.
pub fn one_time_public_key(derivation: &Scalar, spend_public: &PublicKey) -> PublicKey {
    PublicKey::from_point(scalar_base_mult(derivation) + spend_public.as_point())
}

// ═══════════════════════════════════════════════════════════════════════════════
// AMOUNTS
// ═══════════════════════════════════════════════════════════════════════════════

fn amount_keystream(derivation: &Scalar) -> [u8; 32] {
    keccak256_concat(&[AMOUNT_PREFIX, derivation.as_bytes()])
}

/// Decrypts an encrypted output amount.
///
/// The ciphertext is XORed with the keystream over its own length and read as
/// little-endian, with missing high bytes taken as zero.
///
/// # Errors
/// Returns `InvalidAmountEncoding` if the ciphertext is empty or longer than
/// 8 bytes.
pub fn decrypt_amount(derivation: &Scalar, encrypted: &[u8]) -> Result<u64> {
    if encrypted.is_empty() || encrypted.len() > MAX_ENCRYPTED_AMOUNT_SIZE {
        return Err(XmrError::InvalidAmountEncoding(format!(
            "expected 1 to {} bytes, got {}",
            MAX_ENCRYPTED_AMOUNT_SIZE,
            encrypted.len()
        )));
    }

    let keystream = amount_keystream(derivation);
    let mut plain = [0u8; MAX_ENCRYPTED_AMOUNT_SIZE];
    for (i, (c, k)) in encrypted.iter().zip(keystream.iter()).enumerate() {
        plain[i] = c ^ k;
    }
    Ok(u64::from_le_bytes(plain))
}

/// Encrypts an amount into the 8-byte form carried by outputs.
pub fn encrypt_amount(derivation: &Scalar, amount: u64) -> [u8; MAX_ENCRYPTED_AMOUNT_SIZE] {
    let keystream = amount_keystream(derivation);
    let mut out = amount.to_le_bytes();
    for (c, k) in out.iter_mut().zip(keystream.iter()) {
        *c ^= k;
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// SUBADDRESSES
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes the subaddress secret `m` for index (major, minor).
pub fn subaddress_secret(view: &PrivateKey, major: u32, minor: u32) -> Scalar {
    let mut view_bytes = view.to_bytes();
    let m = keccak_to_scalar(&[
        SUBADDRESS_PREFIX,
        &view_bytes,
        &major.to_le_bytes(),
        &minor.to_le_bytes(),
    ]);
    view_bytes.zeroize();
    m
}

/// Derives the public (spend, view) keys of subaddress (major, minor).
pub fn subaddress_public_keys(
    view: &PrivateKey,
    spend_public: &PublicKey,
    major: u32,
    minor: u32,
) -> (PublicKey, PublicKey) {
    let m = subaddress_secret(view, major, minor);
    let spend = one_time_public_key(&m, spend_public);
    let view_public = spend.mul_scalar(view.as_scalar());
    (spend, view_public)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TX_PUB: &str = "7302dd77bf4095baf868de43b7a32f4a36fe9d8b48ccfff537157a4a786fa364";
    const VIEW_KEY: &str = "8aa763d1c8d9da4ca75cb6ca22a021b5cca376c1367be8d62bcc9cdf4b926009";
    const SPEND_PUB: &str = "38e9908d33d034de0ba1281aa7afe3907b795cea14852b3d8fe276e8931cb130";
    const VIEW_PUB: &str = "b4cdbf52851002fc7b098b99536df8b9885aa6cb8db24e9fc46103674dc9421a";
    const OUT_KEY: &str = "7e4f4427539b206740bed78b81b0dc10acb89aa1545880863f73264492ee0c16";

    fn fixture() -> (PrivateKey, PublicKey, PublicKey) {
        (
            PrivateKey::from_hex(VIEW_KEY).unwrap(),
            PublicKey::from_hex(TX_PUB).unwrap(),
            PublicKey::from_hex(SPEND_PUB).unwrap(),
        )
    }

    #[test]
    fn test_view_public_matches_address() {
        let view = PrivateKey::from_hex(VIEW_KEY).unwrap();
        assert_eq!(public_from_private(&view).to_hex(), VIEW_PUB);
    }

    #[test]
    fn test_one_time_key_vector() {
        let (view, tx_pub, spend_pub) = fixture();
        let secret = shared_secret(&view, &tx_pub);
        let si = derivation_scalar(&secret, 1);
        assert_eq!(one_time_public_key(&si, &spend_pub).to_hex(), OUT_KEY);

        // a different index derives a different key
        let other = derivation_scalar(&secret, 0);
        assert_ne!(one_time_public_key(&other, &spend_pub).to_hex(), OUT_KEY);
    }

    #[test]
    fn test_decrypt_amount_vector() {
        let (view, tx_pub, _) = fixture();
        let si = derivation_scalar(&shared_secret(&view, &tx_pub), 1);
        let encrypted = hex::decode("5db33f80fd4990bc").unwrap();
        assert_eq!(decrypt_amount(&si, &encrypted).unwrap(), 550_000_000_000);
    }

    #[test]
    fn test_amount_encrypt_decrypt() {
        let si = keccak_to_scalar(&[b"any derivation"]);
        let encrypted = encrypt_amount(&si, 123_456_789);
        assert_eq!(decrypt_amount(&si, &encrypted).unwrap(), 123_456_789);
    }

    #[test]
    fn test_short_amount_zero_extended() {
        let si = keccak_to_scalar(&[b"short"]);
        let encrypted = encrypt_amount(&si, 0x42);
        // the high bytes of a small amount only carry keystream
        assert_eq!(decrypt_amount(&si, &encrypted[..1]).unwrap(), 0x42);
    }

    #[test]
    fn test_amount_length_rejected() {
        let si = Scalar::ONE;
        assert!(matches!(
            decrypt_amount(&si, &[]),
            Err(XmrError::InvalidAmountEncoding(_))
        ));
        assert!(matches!(
            decrypt_amount(&si, &[0u8; 9]),
            Err(XmrError::InvalidAmountEncoding(_))
        ));
    }

    #[test]
    fn test_sender_and_receiver_agree() {
        let view = PrivateKey::generate();
        let tx_secret = PrivateKey::generate();

        let receiver = shared_secret(&view, &tx_secret.public_key());
        let sender = shared_secret(&tx_secret, &view.public_key());
        assert_eq!(receiver.as_bytes(), sender.as_bytes());
    }

    #[test]
    fn test_private_view_from_spend_deterministic() {
        let spend =
            PrivateKey::from_hex("0cca07dc4e90fc738fffdb2561dddd7a94d0dc8977d0229303d7509a10c9d705")
                .unwrap();
        let a = private_view_from_private_spend(&spend);
        let b = private_view_from_private_spend(&spend);
        assert_eq!(a, b);
        assert_ne!(a, spend);
    }

    #[test]
    fn test_subaddress_view_key_relation() {
        let view = PrivateKey::generate();
        let spend = PrivateKey::generate().public_key();
        let (d, c) = subaddress_public_keys(&view, &spend, 3, 7);

        // C = v·D
        assert_eq!(c, d.mul_scalar(view.as_scalar()));
        // distinct indices give distinct keys
        let (d2, _) = subaddress_public_keys(&view, &spend, 7, 3);
        assert_ne!(d, d2);
    }
}
