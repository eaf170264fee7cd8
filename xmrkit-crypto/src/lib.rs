//! # xmrkit Cryptography
//!
//! Ed25519 and Keccak primitives for the Monero address scheme.
//!
//! This crate provides:
//!
//! - **Keys**: private/public key types and group operations over `curve25519-dalek`
//! - **Hash**: legacy Keccak-256 and hash-to-scalar
//! - **Base58**: Monero's fixed-width block Base58
//! - **View Tags**: one-byte output pre-filter
//! - **Derivation**: shared secrets, one-time keys, amounts, subaddress keys
//!
//! ## Security Properties
//!
//! - Private keys and shared secrets are zeroized on drop
//! - View tag and private key comparisons are constant time
//! - Every parser rejects non-canonical encodings
//!
//! ## Example
//!
//! ```rust
//! use xmrkit_crypto::{derivation_scalar, one_time_public_key, shared_secret, PrivateKey};
//!
//! let view = PrivateKey::generate();
//! let spend = PrivateKey::generate().public_key();
//! let tx_secret = PrivateKey::generate();
//!
//! // Sender derives the output key from the recipient's public keys
//! let sender_secret = shared_secret(&tx_secret, &view.public_key());
//! let output_key = one_time_public_key(&derivation_scalar(&sender_secret, 0), &spend);
//!
//! // Receiver recomputes it from the transaction public key
//! let receiver_secret = shared_secret(&view, &tx_secret.public_key());
//! let expected = one_time_public_key(&derivation_scalar(&receiver_secret, 0), &spend);
//! assert_eq!(output_key, expected);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod base58;
pub mod derive;
pub mod hash;
pub mod keys;
pub mod view_tag;

// Re-export main items at crate root
pub use derive::{
    decrypt_amount, derivation_scalar, encrypt_amount, one_time_public_key,
    private_view_from_private_spend, public_from_private, shared_secret,
    subaddress_public_keys, subaddress_secret, SharedSecret,
};
pub use hash::{checksum, hash_to_scalar, keccak256, keccak256_concat, keccak_to_scalar};
pub use keys::{
    mult_by_cofactor, point_add, point_from_bytes, scalar_base_mult,
    scalar_from_canonical_bytes, scalar_mult, PrivateKey, PublicKey,
};
pub use view_tag::{compute_view_tag, encode_output_index, parse_view_tag, verify_view_tag};

pub use curve25519_dalek::edwards::EdwardsPoint;
pub use curve25519_dalek::scalar::Scalar;
