//! Domain types for xmrkit.
//!
//! - [`NetworkType`] / [`AddressType`]: the two axes of the address prefix table
//! - [`LedgerTransaction`] / [`LedgerOutput`]: transaction records as a daemon delivers them

mod ledger;
mod network;

pub use ledger::*;
pub use network::*;
