//! Network and address kinds, and the prefix table joining them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, XmrError};

/// Monero network an address belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Production network
    Mainnet,
    /// Public staging network
    Stagenet,
    /// Developer test network
    Testnet,
}

/// Kind of a Monero address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    /// Account primary address
    Primary,
    /// Subaddress (major, minor) != (0, 0)
    Sub,
    /// Primary address with an embedded 8-byte payment id
    Integrated,
}

impl NetworkType {
    /// All supported networks.
    pub const ALL: [NetworkType; 3] = [
        NetworkType::Mainnet,
        NetworkType::Stagenet,
        NetworkType::Testnet,
    ];

    /// Returns the lowercase network name.
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => "mainnet",
            NetworkType::Stagenet => "stagenet",
            NetworkType::Testnet => "testnet",
        }
    }
}

impl AddressType {
    /// All address kinds.
    pub const ALL: [AddressType; 3] = [
        AddressType::Primary,
        AddressType::Sub,
        AddressType::Integrated,
    ];

    /// Returns the lowercase type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Primary => "primary",
            AddressType::Sub => "sub",
            AddressType::Integrated => "integrated",
        }
    }
}

/// Returns the address prefix byte for a network and address type.
pub const fn prefix(network: NetworkType, address_type: AddressType) -> u8 {
    match (network, address_type) {
        (NetworkType::Mainnet, AddressType::Primary) => 0x12,
        (NetworkType::Mainnet, AddressType::Sub) => 0x2a,
        (NetworkType::Mainnet, AddressType::Integrated) => 0x13,

        (NetworkType::Stagenet, AddressType::Primary) => 0x18,
        (NetworkType::Stagenet, AddressType::Sub) => 0x24,
        (NetworkType::Stagenet, AddressType::Integrated) => 0x19,

        (NetworkType::Testnet, AddressType::Primary) => 0x35,
        (NetworkType::Testnet, AddressType::Sub) => 0x3f,
        (NetworkType::Testnet, AddressType::Integrated) => 0x36,
    }
}

/// Resolves a prefix byte to its network and address type.
///
/// # Errors
/// Returns `InvalidAddressPrefix` if the byte is not one of the 9 known prefixes.
pub fn network_and_address_type(prefix: u8) -> Result<(NetworkType, AddressType)> {
    match prefix {
        0x12 => Ok((NetworkType::Mainnet, AddressType::Primary)),
        0x2a => Ok((NetworkType::Mainnet, AddressType::Sub)),
        0x13 => Ok((NetworkType::Mainnet, AddressType::Integrated)),

        0x18 => Ok((NetworkType::Stagenet, AddressType::Primary)),
        0x24 => Ok((NetworkType::Stagenet, AddressType::Sub)),
        0x19 => Ok((NetworkType::Stagenet, AddressType::Integrated)),

        0x35 => Ok((NetworkType::Testnet, AddressType::Primary)),
        0x3f => Ok((NetworkType::Testnet, AddressType::Sub)),
        0x36 => Ok((NetworkType::Testnet, AddressType::Integrated)),

        other => Err(XmrError::InvalidAddressPrefix(other)),
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkType {
    type Err = XmrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkType::Mainnet),
            "stagenet" | "stage" => Ok(NetworkType::Stagenet),
            "testnet" | "test" => Ok(NetworkType::Testnet),
            other => Err(XmrError::InvalidNetworkOrAddressType(format!(
                "unknown network '{}'",
                other
            ))),
        }
    }
}

impl FromStr for AddressType {
    type Err = XmrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Ok(AddressType::Primary),
            "sub" | "subaddress" => Ok(AddressType::Sub),
            "integrated" => Ok(AddressType::Integrated),
            other => Err(XmrError::InvalidNetworkOrAddressType(format!(
                "unknown address type '{}'",
                other
            ))),
        }
    }
}
