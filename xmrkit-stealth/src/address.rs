//! Monero addresses: Base58 codec and the typed [`MoneroAddress`].
//!
//! ## Layout (decoded)
//!
//! ```text
//! prefix (1) || spend key (32) || view key (32) || [payment id (8)] || checksum (4)
//! ```
//!
//! The payment id is present only on integrated addresses. The checksum is
//! the first 4 bytes of Keccak-256 over everything before it. Encoded, a
//! primary or sub address is 95 characters and an integrated address 106.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use xmrkit_core::constants::{
    ADDRESS_DECODED_SIZE, ADDRESS_SIZE, CHECKSUM_SIZE, INTEGRATED_ADDRESS_DECODED_SIZE,
    INTEGRATED_ADDRESS_SIZE, KEY_SIZE, PAYMENT_ID_OFFSET, PAYMENT_ID_SIZE, SPEND_KEY_OFFSET,
    VIEW_KEY_OFFSET,
};
use xmrkit_core::error::{Result, XmrError};
use xmrkit_core::types::{network_and_address_type, prefix, AddressType, NetworkType};
use xmrkit_crypto::{base58, checksum, PublicKey};

// ═══════════════════════════════════════════════════════════════════════════════
// CODEC
// ═══════════════════════════════════════════════════════════════════════════════

fn verify_checksum(bytes: &[u8]) -> Result<()> {
    let (payload, expected) = bytes.split_at(bytes.len() - CHECKSUM_SIZE);
    if checksum(payload).as_slice() != expected {
        return Err(XmrError::InvalidAddressChecksum);
    }
    Ok(())
}

/// Decodes an address string into its 69 or 77 byte form and verifies the
/// checksum.
///
/// # Errors
/// - `InvalidAddressLength` unless the string has 95 or 106 characters
/// - `InvalidAddressEncoding` for characters outside the Base58 alphabet
/// - `InvalidAddressChecksum` if the checksum does not match
pub fn decode(address: &str) -> Result<Vec<u8>> {
    let chars = address.chars().count();
    if chars != ADDRESS_SIZE && chars != INTEGRATED_ADDRESS_SIZE {
        return Err(XmrError::InvalidAddressLength { actual: chars });
    }

    let bytes = base58::decode(address)?;
    verify_checksum(&bytes)?;
    Ok(bytes)
}

/// Encodes a decoded address buffer.
///
/// # Errors
/// - `InvalidAddressLength` unless the buffer has 69 or 77 bytes
/// - `InvalidAddressChecksum` if the trailing checksum does not match
pub fn encode(bytes: &[u8]) -> Result<String> {
    if bytes.len() != ADDRESS_DECODED_SIZE && bytes.len() != INTEGRATED_ADDRESS_DECODED_SIZE {
        return Err(XmrError::InvalidAddressLength {
            actual: bytes.len(),
        });
    }
    verify_checksum(bytes)?;
    Ok(base58::encode(bytes))
}

// ═══════════════════════════════════════════════════════════════════════════════
// TYPED ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// Validated contents shared by every address kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AddressData {
    bytes: Vec<u8>,
    encoded: String,
    network: NetworkType,
    spend: PublicKey,
    view: PublicKey,
}

/// A decoded, checksum-valid Monero address.
///
/// Only the `Integrated` arm carries a payment id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoneroAddress {
    /// Account primary address
    Primary(AddressData),
    /// Subaddress
    Sub(AddressData),
    /// Primary address with an embedded payment id
    Integrated(AddressData),
}

/// Parses and validates an address string.
///
/// # Errors
/// Any error from [`decode`], plus `InvalidAddressPrefix` for an unknown
/// prefix and `InvalidKeyEncoding` if an embedded key is not a curve point.
pub fn new_address(address: &str) -> Result<MoneroAddress> {
    MoneroAddress::from_bytes(&decode(address)?)
}

impl MoneroAddress {
    /// Builds an address from a decoded buffer (prefix through checksum).
    ///
    /// # Errors
    /// - `InvalidAddressLength` if the length does not match the prefix's kind
    /// - `InvalidAddressChecksum`, `InvalidAddressPrefix`, `InvalidKeyEncoding`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ADDRESS_DECODED_SIZE && bytes.len() != INTEGRATED_ADDRESS_DECODED_SIZE {
            return Err(XmrError::InvalidAddressLength {
                actual: bytes.len(),
            });
        }
        verify_checksum(bytes)?;

        let (network, address_type) = network_and_address_type(bytes[0])?;
        let expected_len = match address_type {
            AddressType::Integrated => INTEGRATED_ADDRESS_DECODED_SIZE,
            AddressType::Primary | AddressType::Sub => ADDRESS_DECODED_SIZE,
        };
        if bytes.len() != expected_len {
            return Err(XmrError::InvalidAddressLength {
                actual: bytes.len(),
            });
        }

        let data = AddressData {
            bytes: bytes.to_vec(),
            encoded: base58::encode(bytes),
            network,
            spend: PublicKey::from_bytes(&bytes[SPEND_KEY_OFFSET..VIEW_KEY_OFFSET])?,
            view: PublicKey::from_bytes(&bytes[VIEW_KEY_OFFSET..VIEW_KEY_OFFSET + KEY_SIZE])?,
        };

        Ok(Self::wrap(address_type, data))
    }

    /// Builds a primary or sub address from its public keys.
    ///
    /// # Errors
    /// Returns `InvalidAddressType` for `AddressType::Integrated`; use
    /// [`MoneroAddress::integrated`] on a primary address instead.
    pub fn from_keys(
        network: NetworkType,
        address_type: AddressType,
        spend: &PublicKey,
        view: &PublicKey,
    ) -> Result<Self> {
        if address_type == AddressType::Integrated {
            return Err(XmrError::InvalidAddressType {
                expected: "primary or sub".into(),
                actual: address_type.to_string(),
            });
        }
        Ok(Self::build(network, address_type, spend, view, None))
    }

    /// Assembles and checksums an address. Callers guarantee that a payment
    /// id is given exactly for integrated addresses.
    pub(crate) fn build(
        network: NetworkType,
        address_type: AddressType,
        spend: &PublicKey,
        view: &PublicKey,
        payment_id: Option<&[u8; PAYMENT_ID_SIZE]>,
    ) -> Self {
        let size = match payment_id {
            Some(_) => INTEGRATED_ADDRESS_DECODED_SIZE,
            None => ADDRESS_DECODED_SIZE,
        };
        let mut bytes = Vec::with_capacity(size);
        bytes.push(prefix(network, address_type));
        bytes.extend_from_slice(spend.as_bytes());
        bytes.extend_from_slice(view.as_bytes());
        if let Some(id) = payment_id {
            bytes.extend_from_slice(id);
        }
        let sum = checksum(&bytes);
        bytes.extend_from_slice(&sum);

        let data = AddressData {
            encoded: base58::encode(&bytes),
            bytes,
            network,
            spend: *spend,
            view: *view,
        };
        Self::wrap(address_type, data)
    }

    fn wrap(address_type: AddressType, data: AddressData) -> Self {
        match address_type {
            AddressType::Primary => MoneroAddress::Primary(data),
            AddressType::Sub => MoneroAddress::Sub(data),
            AddressType::Integrated => MoneroAddress::Integrated(data),
        }
    }

    fn data(&self) -> &AddressData {
        match self {
            MoneroAddress::Primary(data)
            | MoneroAddress::Sub(data)
            | MoneroAddress::Integrated(data) => data,
        }
    }

    /// Returns the integrated address for this primary address.
    ///
    /// # Errors
    /// Returns `InvalidAddressType` unless `self` is a primary address.
    pub fn integrated(&self, payment_id: [u8; PAYMENT_ID_SIZE]) -> Result<Self> {
        match self {
            MoneroAddress::Primary(data) => Ok(Self::build(
                data.network,
                AddressType::Integrated,
                &data.spend,
                &data.view,
                Some(&payment_id),
            )),
            other => Err(XmrError::InvalidAddressType {
                expected: AddressType::Primary.to_string(),
                actual: other.address_type().to_string(),
            }),
        }
    }

    /// Returns the public spend key.
    pub fn public_spend_key(&self) -> &PublicKey {
        &self.data().spend
    }

    /// Returns the public view key.
    pub fn public_view_key(&self) -> &PublicKey {
        &self.data().view
    }

    /// Returns the payment id of an integrated address.
    pub fn payment_id(&self) -> Option<[u8; PAYMENT_ID_SIZE]> {
        match self {
            MoneroAddress::Integrated(data) => {
                let mut id = [0u8; PAYMENT_ID_SIZE];
                id.copy_from_slice(&data.bytes[PAYMENT_ID_OFFSET..PAYMENT_ID_OFFSET + PAYMENT_ID_SIZE]);
                Some(id)
            }
            _ => None,
        }
    }

    /// Returns the network.
    pub fn network_type(&self) -> NetworkType {
        self.data().network
    }

    /// Returns the address kind.
    pub fn address_type(&self) -> AddressType {
        match self {
            MoneroAddress::Primary(_) => AddressType::Primary,
            MoneroAddress::Sub(_) => AddressType::Sub,
            MoneroAddress::Integrated(_) => AddressType::Integrated,
        }
    }

    /// Returns the Base58 string form.
    pub fn address(&self) -> &str {
        &self.data().encoded
    }

    /// Returns the decoded buffer, checksum included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data().bytes
    }
}

impl fmt::Display for MoneroAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.address())
    }
}

impl FromStr for MoneroAddress {
    type Err = XmrError;

    fn from_str(s: &str) -> Result<Self> {
        new_address(s)
    }
}

impl Serialize for MoneroAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.address())
    }
}

impl<'de> Deserialize<'de> for MoneroAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        new_address(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    const MAINNET_PRIMARY: &str = "48ukkZtBSBRL8iva7k3p2sBVMLWTfNwsTbW1aVh5M84g21muDCssvCHTpoZCaSc6rq8M9QLZ3sQMrMn1bq2RD2anGnyHhtq";
    const MAINNET_INTEGRATED: &str = "4JcRmNhg3SwL8iva7k3p2sBVMLWTfNwsTbW1aVh5M84g21muDCssvCHTpoZCaSc6rq8M9QLZ3sQMrMn1bq2RD2anQMXGeH3St98D3GPzmn";

    #[test_case(
        "48ukkZtBSBRL8iva7k3p2sBVMLWTfNwsTbW1aVh5M84g21muDCssvCHTpoZCaSc6rq8M9QLZ3sQMrMn1bq2RD2anGnyHhtq",
        "12c04ac8adc844e07263bf9a4dd337883eb55db89743c9aece4357381ae6c0b1060ef3c9e1146ed2a05f0eb4b25e41662bed41fa246251257c363a8ba95750cb8bfa84423e",
        NetworkType::Mainnet, AddressType::Primary, None
        ; "mainnet primary"
    )]
    #[test_case(
        "84nvgV2eTnG1vAKbg87MnbfjWrSY3eH3s2eykmggk549C8zdNk4PPD7iv7BPfPsnoH9NjXaRhjC19FY6PBmXZUtoG5SEiY7",
        "2a3dba53246e6981057ad2a9eff6d164e791cdef4578caee09e4b6ea03af774e4296b37bede10496fa98e0a7c58c49403211b225643621e456e7d2d4d8c13b6885a192d0a8",
        NetworkType::Mainnet, AddressType::Sub, None
        ; "mainnet sub"
    )]
    #[test_case(
        "4JcRmNhg3SwL8iva7k3p2sBVMLWTfNwsTbW1aVh5M84g21muDCssvCHTpoZCaSc6rq8M9QLZ3sQMrMn1bq2RD2anQMXGeH3St98D3GPzmn",
        "13c04ac8adc844e07263bf9a4dd337883eb55db89743c9aece4357381ae6c0b1060ef3c9e1146ed2a05f0eb4b25e41662bed41fa246251257c363a8ba95750cb8b9f9739432368cb6ab57ad0c9",
        NetworkType::Mainnet, AddressType::Integrated, Some("9f9739432368cb6a")
        ; "mainnet integrated"
    )]
    #[test_case(
        "53zEYzu2hi3e97tdMTqTvSRAfFYXwxA7LBJEHLWvFnm699WgcsE8CJujENwNAQotKyY2u94vpbGEZTiwahuMcMfX3x6NFwY",
        "1838e9908d33d034de0ba1281aa7afe3907b795cea14852b3d8fe276e8931cb130b4cdbf52851002fc7b098b99536df8b9885aa6cb8db24e9fc46103674dc9421a25777ccb",
        NetworkType::Stagenet, AddressType::Primary, None
        ; "stagenet primary"
    )]
    #[test_case(
        "74xhb5sXRsnDZv8RKFEv7LAMfUq5AmGEEB77SVvsUJf8bLvFMSEfc8YYyJHF6xNNnjAZQmgqZp76AjT8bD6qKkLZLeR42oi",
        "2447a69d7aa0d0b14b22e2ff185b2e8b37effd771fee0c8b3c6a7ff9d53910ffcd536bab26fc7101bf23da6b6a39daa83925f5393df58a1bfdcb8edcc388726aae2014d691",
        NetworkType::Stagenet, AddressType::Sub, None
        ; "stagenet sub"
    )]
    #[test_case(
        "5DguZoiXJyZe97tdMTqTvSRAfFYXwxA7LBJEHLWvFnm699WgcsE8CJujENwNAQotKyY2u94vpbGEZTiwahuMcMfX5MsmWgk84zrS4MPMnW",
        "1938e9908d33d034de0ba1281aa7afe3907b795cea14852b3d8fe276e8931cb130b4cdbf52851002fc7b098b99536df8b9885aa6cb8db24e9fc46103674dc9421a10f5ebd54675efde19e372ef",
        NetworkType::Stagenet, AddressType::Integrated, Some("10f5ebd54675efde")
        ; "stagenet integrated"
    )]
    #[test_case(
        "9zvkxwHbuHxX8B82zA8G9yBh6oKzbXS8viKexKeBCVBwNeP246aVAKSiC1DyVoETYZ11qDdmibSShX88HWGevRbp3G6hKyK",
        "35ccc9377cde8377b4190b13b1384c2c3feb697bc98a783ff70bbdf789d623e2816763ef0f8d3b41f641db860acbe5360015f00f6d0f05b6b417c0ad4708277b1408cfe1ba",
        NetworkType::Testnet, AddressType::Primary, None
        ; "testnet primary"
    )]
    #[test_case(
        "Be4mtTzNR3gGe7S9foMPdiLnv7jP2cfR3FB4YiNjNQFh8Q6WGortUdtXgwumP6xRu8MxdozhRjXMf4gCwwwE7NtRQ5jMkJd",
        "3f9b5365b83a95d35d8127e5af7b9fa976539907f255ad9254bcd54705a7e6582c3b1aba22c7292fb779d907deb9fbd77d4e96286f22053615fa273513938b9acc95b06f0a",
        NetworkType::Testnet, AddressType::Sub, None
        ; "testnet sub"
    )]
    #[test_case(
        "AAdRyk76WZUX8B82zA8G9yBh6oKzbXS8viKexKeBCVBwNeP246aVAKSiC1DyVoETYZ11qDdmibSShX88HWGevRbp4MEeHy9Xttg2tozpVS",
        "36ccc9377cde8377b4190b13b1384c2c3feb697bc98a783ff70bbdf789d623e2816763ef0f8d3b41f641db860acbe5360015f00f6d0f05b6b417c0ad4708277b14058bca5e06c79110c7fd10f5",
        NetworkType::Testnet, AddressType::Integrated, Some("058bca5e06c79110")
        ; "testnet integrated"
    )]
    fn test_address_vectors(
        address: &str,
        decoded_hex: &str,
        network: NetworkType,
        address_type: AddressType,
        payment_id: Option<&str>,
    ) {
        let decoded = hex::decode(decoded_hex).unwrap();
        assert_eq!(decode(address).unwrap(), decoded);
        assert_eq!(encode(&decoded).unwrap(), address);

        let parsed = new_address(address).unwrap();
        assert_eq!(parsed.network_type(), network);
        assert_eq!(parsed.address_type(), address_type);
        assert_eq!(parsed.address(), address);
        assert_eq!(parsed.as_bytes(), decoded.as_slice());
        assert_eq!(parsed.public_spend_key().as_bytes(), &decoded[1..33]);
        assert_eq!(parsed.public_view_key().as_bytes(), &decoded[33..65]);
        assert_eq!(parsed.payment_id().map(hex::encode).as_deref(), payment_id);
    }

    #[test]
    fn test_primary_address_keys() {
        let address = new_address(MAINNET_PRIMARY).unwrap();
        assert_eq!(
            address.public_spend_key().to_hex(),
            "c04ac8adc844e07263bf9a4dd337883eb55db89743c9aece4357381ae6c0b106"
        );
        assert_eq!(
            address.public_view_key().to_hex(),
            "0ef3c9e1146ed2a05f0eb4b25e41662bed41fa246251257c363a8ba95750cb8b"
        );
    }

    #[test]
    fn test_integrated_from_primary() {
        let primary = new_address(MAINNET_PRIMARY).unwrap();
        let payment_id: [u8; 8] = hex::decode("9f9739432368cb6a").unwrap().try_into().unwrap();
        let integrated = primary.integrated(payment_id).unwrap();
        assert_eq!(integrated.address(), MAINNET_INTEGRATED);

        // only primary addresses can be integrated
        assert!(matches!(
            integrated.integrated(payment_id),
            Err(XmrError::InvalidAddressType { .. })
        ));
    }

    #[test]
    fn test_from_keys() {
        let primary = new_address(MAINNET_PRIMARY).unwrap();
        let rebuilt = MoneroAddress::from_keys(
            NetworkType::Mainnet,
            AddressType::Primary,
            primary.public_spend_key(),
            primary.public_view_key(),
        )
        .unwrap();
        assert_eq!(rebuilt, primary);

        assert!(matches!(
            MoneroAddress::from_keys(
                NetworkType::Mainnet,
                AddressType::Integrated,
                primary.public_spend_key(),
                primary.public_view_key(),
            ),
            Err(XmrError::InvalidAddressType { .. })
        ));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(matches!(
            decode(&MAINNET_PRIMARY[..94]),
            Err(XmrError::InvalidAddressLength { actual: 94 })
        ));
        assert!(matches!(
            decode(""),
            Err(XmrError::InvalidAddressLength { actual: 0 })
        ));
        assert!(matches!(
            encode(&[0u8; 70]),
            Err(XmrError::InvalidAddressLength { actual: 70 })
        ));
    }

    #[test]
    fn test_checksum_mismatch_rejected() {
        // flip the last character
        let mut tampered = MAINNET_PRIMARY.to_string();
        tampered.pop();
        tampered.push('r');
        assert!(matches!(
            decode(&tampered),
            Err(XmrError::InvalidAddressChecksum)
        ));

        let mut bytes = decode(MAINNET_PRIMARY).unwrap();
        bytes[10] ^= 0x01;
        assert!(matches!(encode(&bytes), Err(XmrError::InvalidAddressChecksum)));
    }

    #[test]
    fn test_invalid_characters_rejected() {
        let tampered = format!("0{}", &MAINNET_PRIMARY[1..]);
        assert!(matches!(
            decode(&tampered),
            Err(XmrError::InvalidAddressEncoding(_))
        ));
    }

    #[test]
    fn test_multibyte_characters_counted_as_codepoints() {
        // 95 codepoints but not ASCII
        let tampered = format!("é{}", &MAINNET_PRIMARY[1..]);
        assert_eq!(tampered.chars().count(), 95);
        assert!(matches!(
            decode(&tampered),
            Err(XmrError::InvalidAddressEncoding(_))
        ));
    }

    #[test]
    fn test_unknown_prefix_rejected() {
        let mut bytes = decode(MAINNET_PRIMARY).unwrap();
        bytes[0] = 0x00;
        let sum = checksum(&bytes[..65]);
        bytes[65..].copy_from_slice(&sum);

        let encoded = encode(&bytes).unwrap();
        assert!(matches!(
            new_address(&encoded),
            Err(XmrError::InvalidAddressPrefix(0x00))
        ));
    }

    #[test]
    fn test_prefix_length_mismatch_rejected() {
        // integrated prefix on a 69 byte buffer
        let mut bytes = decode(MAINNET_PRIMARY).unwrap();
        bytes[0] = 0x13;
        let sum = checksum(&bytes[..65]);
        bytes[65..].copy_from_slice(&sum);

        assert!(matches!(
            MoneroAddress::from_bytes(&bytes),
            Err(XmrError::InvalidAddressLength { actual: 69 })
        ));
    }

    #[test]
    fn test_from_str_display_serde() {
        let address: MoneroAddress = MAINNET_PRIMARY.parse().unwrap();
        assert_eq!(address.to_string(), MAINNET_PRIMARY);

        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", MAINNET_PRIMARY));
        let back: MoneroAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);

        assert!(serde_json::from_str::<MoneroAddress>("\"4abc\"").is_err());
    }

    proptest! {
        #[test]
        fn test_checksummed_buffers_roundtrip(
            payload in proptest::collection::vec(any::<u8>(), 65..=65),
            integrated in any::<bool>(),
        ) {
            let mut bytes = payload;
            if integrated {
                bytes.extend_from_slice(&[0xab; 8]);
            }
            let sum = checksum(&bytes);
            bytes.extend_from_slice(&sum);

            let encoded = encode(&bytes).unwrap();
            let expected_len = if integrated { 106 } else { 95 };
            prop_assert_eq!(encoded.len(), expected_len);
            prop_assert_eq!(decode(&encoded).unwrap(), bytes);
        }
    }
}
