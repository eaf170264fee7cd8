//! # xmrkit Core
//!
//! Core types, errors, and traits for the Monero address scheme.
//!
//! This crate provides the foundational building blocks used by all other xmrkit crates:
//!
//! - **Types**: network/address kinds with the prefix table, ledger records
//! - **Errors**: one error enum for every failure mode
//! - **Constants**: address layout, hash prefixes, extra offsets
//! - **Amount**: atomic unit conversions
//! - **Traits**: the transaction source collaborator
//!
//! ## Example
//!
//! ```rust
//! use xmrkit_core::{network_and_address_type, AddressType, NetworkType};
//!
//! let (network, kind) = network_and_address_type(0x12).unwrap();
//! assert_eq!(network, NetworkType::Mainnet);
//! assert_eq!(kind, AddressType::Primary);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod amount;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use amount::{float_to_xmr, xmr_to_decimal, xmr_to_float};
pub use constants::*;
pub use error::{Result, XmrError};
pub use traits::*;
pub use types::*;
