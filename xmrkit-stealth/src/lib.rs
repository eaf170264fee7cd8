//! # xmrkit Stealth Addresses
//!
//! High-level API for Monero addresses and output discovery.
//!
//! This crate provides:
//!
//! - **Key Pairs**: full and view-only account keys
//! - **Addresses**: decode, validate and build primary, sub and integrated addresses
//! - **Subaddresses**: deterministic (major, minor) receiving addresses
//! - **Extra Parsing**: transaction public key and payment id from the extra field
//! - **Discovery**: view tag filter, ownership check and amount decryption
//! - **Payments**: sender-side output construction and payment ids
//!
//! ## Quick Start
//!
//! ```rust
//! use xmrkit_core::types::NetworkType;
//! use xmrkit_stealth::{decrypt_if_owned_by_spend_key, FullKeyPair, StealthPaymentBuilder};
//!
//! // Recipient: create an account and hand out its address
//! let wallet = FullKeyPair::generate();
//! let address = wallet.primary_address(NetworkType::Mainnet);
//!
//! // Sender: pay 0.5 XMR to it
//! let payment = StealthPaymentBuilder::new()
//!     .recipient(address, 500_000_000_000)
//!     .build()
//!     .unwrap();
//!
//! // Recipient: find the output with the view key
//! let output = &payment.outputs[0];
//! let (owned, amount) = decrypt_if_owned_by_spend_key(
//!     wallet.spend_key_pair().public_key(),
//!     0,
//!     &output.output_key,
//!     &output.encrypted_amount,
//!     &payment.tx_public_key,
//!     wallet.view_key_pair().private_key(),
//! )
//! .unwrap();
//! assert!(owned);
//! assert_eq!(amount, 500_000_000_000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod address;
pub mod discovery;
pub mod extra;
pub mod keys;
pub mod payment;
pub mod subaddress;

pub use address::{new_address, AddressData, MoneroAddress};
pub use discovery::{
    decrypt_if_owned_by_spend_key, decrypt_if_owned_by_spend_key_hex,
    decrypt_if_owned_by_view_tag, decrypt_if_owned_by_view_tag_hex, matches_view_tag,
    matches_view_tag_hex, owns_output, scan_output, scan_output_with_secret, OutputScan,
};
pub use extra::{build_extra, get_payment_id, get_tx_public_key, parse_extra, ParsedExtra};
pub use keys::{FullKeyPair, KeyPair, ViewOnlyKeyPair};
pub use payment::{
    create_output, encrypt_payment_id, new_payment_id256, new_payment_id64, tx_public_key_for,
    StealthOutput, StealthPayment, StealthPaymentBuilder,
};
pub use subaddress::{generate_subaddress, SubaddressIndex};
