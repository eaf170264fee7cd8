//! Account key pairs.
//!
//! - [`KeyPair`]: one private key and its public key
//! - [`ViewOnlyKeyPair`]: view key pair + public spend key (can scan, cannot spend)
//! - [`FullKeyPair`]: view and spend key pairs

use xmrkit_core::error::Result;
use xmrkit_core::types::{AddressType, NetworkType};
use xmrkit_crypto::{private_view_from_private_spend, PrivateKey, PublicKey};

use crate::address::MoneroAddress;
use crate::subaddress::generate_subaddress;

// ═══════════════════════════════════════════════════════════════════════════════
// KEY PAIR
// ═══════════════════════════════════════════════════════════════════════════════

/// A private key and its public key. The public key is always derived, never
/// supplied, so the two cannot disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
}

impl KeyPair {
    /// Creates a key pair from a private key.
    pub fn from_private(private: PrivateKey) -> Self {
        let public = private.public_key();
        Self { private, public }
    }

    /// Creates a key pair from a hex private key.
    pub fn from_hex(s: &str) -> Result<Self> {
        Ok(Self::from_private(PrivateKey::from_hex(s)?))
    }

    /// Generates a random key pair.
    pub fn generate() -> Self {
        Self::from_private(PrivateKey::generate())
    }

    /// Returns the private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VIEW-ONLY
// ═══════════════════════════════════════════════════════════════════════════════

/// Keys that can detect incoming outputs and decrypt their amounts, but not
/// spend them.
///
/// The private view key can be shared with third parties (e.g., auditors)
/// to let them see incoming payments without spending ability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewOnlyKeyPair {
    view: KeyPair,
    spend_public: PublicKey,
}

impl ViewOnlyKeyPair {
    /// Creates view-only keys from the private view key and public spend key.
    pub fn new(view: PrivateKey, spend_public: PublicKey) -> Self {
        Self {
            view: KeyPair::from_private(view),
            spend_public,
        }
    }

    /// Creates view-only keys from hex.
    pub fn from_hex(view_hex: &str, spend_public_hex: &str) -> Result<Self> {
        Ok(Self::new(
            PrivateKey::from_hex(view_hex)?,
            PublicKey::from_hex(spend_public_hex)?,
        ))
    }

    /// Returns the view key pair.
    pub fn view_key_pair(&self) -> &KeyPair {
        &self.view
    }

    /// Returns the private view key.
    pub fn private_view_key(&self) -> &PrivateKey {
        self.view.private_key()
    }

    /// Returns the public view key.
    pub fn public_view_key(&self) -> &PublicKey {
        self.view.public_key()
    }

    /// Returns the public spend key.
    pub fn public_spend_key(&self) -> &PublicKey {
        &self.spend_public
    }

    /// Returns the primary address on `network`.
    pub fn primary_address(&self, network: NetworkType) -> MoneroAddress {
        MoneroAddress::build(
            network,
            AddressType::Primary,
            &self.spend_public,
            self.view.public_key(),
            None,
        )
    }

    /// Returns subaddress (major, minor), or the primary address for (0, 0).
    pub fn subaddress(&self, network: NetworkType, major: u32, minor: u32) -> MoneroAddress {
        if major == 0 && minor == 0 {
            return self.primary_address(network);
        }
        generate_subaddress(
            self.view.private_key(),
            &self.spend_public,
            major,
            minor,
            network,
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FULL KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// Complete account keys (spend + view).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FullKeyPair {
    view: KeyPair,
    spend: KeyPair,
}

impl FullKeyPair {
    /// Restores an account from its private spend key, deriving the view key
    /// the way seed-based wallets do.
    pub fn from_private_spend_key(spend: PrivateKey) -> Self {
        let view = private_view_from_private_spend(&spend);
        Self {
            view: KeyPair::from_private(view),
            spend: KeyPair::from_private(spend),
        }
    }

    /// Creates an account from independent spend and view keys.
    pub fn from_private_keys(spend: PrivateKey, view: PrivateKey) -> Self {
        Self {
            view: KeyPair::from_private(view),
            spend: KeyPair::from_private(spend),
        }
    }

    /// Generates a new account with a deterministic view key.
    pub fn generate() -> Self {
        Self::from_private_spend_key(PrivateKey::generate())
    }

    /// Returns the spend key pair.
    pub fn spend_key_pair(&self) -> &KeyPair {
        &self.spend
    }

    /// Returns the view key pair.
    pub fn view_key_pair(&self) -> &KeyPair {
        &self.view
    }

    /// Drops the private spend key.
    pub fn view_only(&self) -> ViewOnlyKeyPair {
        ViewOnlyKeyPair {
            view: self.view.clone(),
            spend_public: *self.spend.public_key(),
        }
    }

    /// Returns the primary address on `network`.
    pub fn primary_address(&self, network: NetworkType) -> MoneroAddress {
        self.view_only().primary_address(network)
    }

    /// Returns subaddress (major, minor), or the primary address for (0, 0).
    pub fn subaddress(&self, network: NetworkType, major: u32, minor: u32) -> MoneroAddress {
        self.view_only().subaddress(network, major, minor)
    }
}
