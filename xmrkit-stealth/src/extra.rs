//! Transaction extra field parsing.
//!
//! Only the common layout is understood:
//!
//! ```text
//! [0x01][tx public key 32][0x02][0x09][0x01][encrypted payment id 8]
//!  0     1..33             33    34    35    36..44
//! ```
//!
//! Extra fields holding additional public keys or other sub-fields in a
//! different order are not parsed; their payment id reads as absent.

use serde::{Deserialize, Serialize};

use xmrkit_core::constants::{
    EXTRA_PAYMENT_ID_END, EXTRA_PAYMENT_ID_START, EXTRA_TAGS, EXTRA_TX_PUBKEY_END,
    PAYMENT_ID_SIZE, PREFIX_SIZE,
};
use xmrkit_core::error::{Result, XmrError};
use xmrkit_crypto::PublicKey;

/// Tag introducing the transaction public key.
const TAG_TX_PUBKEY: u8 = 0x01;

/// Nonce sub-field header carrying an encrypted payment id
/// (tag, length, encrypted payment id marker).
const NONCE_ENCRYPTED_PAYMENT_ID: [u8; 3] = [0x02, 0x09, 0x01];

fn check_extra(extra: &[u8], required: usize) -> Result<()> {
    let Some(&tag) = extra.first() else {
        return Err(XmrError::InvalidExtraLength {
            required,
            actual: 0,
        });
    };
    if !EXTRA_TAGS.contains(&tag) {
        return Err(XmrError::InvalidExtraTag(tag));
    }
    if extra.len() < required {
        return Err(XmrError::InvalidExtraLength {
            required,
            actual: extra.len(),
        });
    }
    Ok(())
}

/// Extracts the transaction public key from `extra[1..33]`.
///
/// # Errors
/// `InvalidExtraLength` when empty or shorter than 33 bytes, `InvalidExtraTag`
/// for an unknown leading tag, `InvalidKeyEncoding` if the bytes are not a
/// point.
pub fn get_tx_public_key(extra: &[u8]) -> Result<PublicKey> {
    check_extra(extra, EXTRA_TX_PUBKEY_END)?;
    PublicKey::from_bytes(&extra[PREFIX_SIZE..EXTRA_TX_PUBKEY_END])
}

/// Extracts the encrypted payment id from `extra[36..44]`.
///
/// # Errors
/// `InvalidExtraLength` when empty or shorter than 44 bytes, `InvalidExtraTag`
/// for an unknown leading tag.
pub fn get_payment_id(extra: &[u8]) -> Result<[u8; PAYMENT_ID_SIZE]> {
    check_extra(extra, EXTRA_PAYMENT_ID_END)?;
    let mut id = [0u8; PAYMENT_ID_SIZE];
    id.copy_from_slice(&extra[EXTRA_PAYMENT_ID_START..EXTRA_PAYMENT_ID_END]);
    Ok(id)
}

/// Fields recovered from an extra field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedExtra {
    /// Transaction public key, if present and valid
    pub tx_public_key: Option<PublicKey>,
    /// Encrypted payment id, if present
    #[serde(with = "payment_id_hex", default)]
    pub payment_id: Option<[u8; PAYMENT_ID_SIZE]>,
}

/// Best-effort parse: any failure reads as an absent field.
pub fn parse_extra(extra: &[u8]) -> ParsedExtra {
    ParsedExtra {
        tx_public_key: get_tx_public_key(extra).ok(),
        payment_id: get_payment_id(extra).ok(),
    }
}

/// Builds an extra field in the layout [`parse_extra`] understands.
pub fn build_extra(tx_public_key: &PublicKey, payment_id: Option<&[u8; PAYMENT_ID_SIZE]>) -> Vec<u8> {
    let mut extra = Vec::with_capacity(EXTRA_PAYMENT_ID_END);
    extra.push(TAG_TX_PUBKEY);
    extra.extend_from_slice(tx_public_key.as_bytes());
    if let Some(id) = payment_id {
        extra.extend_from_slice(&NONCE_ENCRYPTED_PAYMENT_ID);
        extra.extend_from_slice(id);
    }
    extra
}

mod payment_id_hex {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use xmrkit_core::constants::PAYMENT_ID_SIZE;

    pub fn serialize<S: Serializer>(
        id: &Option<[u8; PAYMENT_ID_SIZE]>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.serialize_some(&hex::encode(id)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<[u8; PAYMENT_ID_SIZE]>, D::Error> {
        let Some(s) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let bytes = hex::decode(&s).map_err(D::Error::custom)?;
        let id: [u8; PAYMENT_ID_SIZE] = bytes
            .try_into()
            .map_err(|_| D::Error::custom("payment id must be 8 bytes"))?;
        Ok(Some(id))
    }
}
