//! Subaddress generation.
//!
//! Subaddresses let one account hand out unlinkable receiving addresses that
//! a single view key can still scan. Index (0, 0) is the primary address by
//! convention; [`generate_subaddress`] does not special-case it, the key pair
//! types do.

use serde::{Deserialize, Serialize};

use xmrkit_core::types::{AddressType, NetworkType};
use xmrkit_crypto::{subaddress_public_keys, PrivateKey, PublicKey};

use crate::address::MoneroAddress;

/// Position of a subaddress in the account tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubaddressIndex {
    /// Account index
    pub major: u32,
    /// Address index within the account
    pub minor: u32,
}

impl SubaddressIndex {
    /// Creates an index.
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Returns true for (0, 0), the primary address.
    pub fn is_primary(&self) -> bool {
        self.major == 0 && self.minor == 0
    }
}

/// Derives subaddress (major, minor) from the private view key and the
/// public spend key.
///
/// ```text
/// m = Hs("SubAddr\0" || v || LE32(major) || LE32(minor))
/// D = m·G + B
/// C = v·D
/// ```
///
/// Always yields a `Sub` address, even for (0, 0).
pub fn generate_subaddress(
    view: &PrivateKey,
    spend: &PublicKey,
    major: u32,
    minor: u32,
    network: NetworkType,
) -> MoneroAddress {
    let (sub_spend, sub_view) = subaddress_public_keys(view, spend, major, minor);
    MoneroAddress::build(network, AddressType::Sub, &sub_spend, &sub_view, None)
}
