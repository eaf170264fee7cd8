//! Protocol constants for xmrkit.
//!
//! Sizes and hash prefixes are fixed by the Monero network. Changing any of
//! them breaks compatibility with addresses and outputs already on chain.

// ═══════════════════════════════════════════════════════════════════════════════
// KEY SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a compressed Ed25519 point or a canonical scalar in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of a Keccak-256 digest in bytes.
pub const KECCAK256_SIZE: usize = 32;

/// Input size of the wide scalar reduction used by hash-to-scalar.
pub const WIDE_REDUCTION_SIZE: usize = 64;

// ═══════════════════════════════════════════════════════════════════════════════
// ADDRESS LAYOUT
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of the address checksum (first bytes of Keccak-256 over the payload).
pub const CHECKSUM_SIZE: usize = 4;

/// Size of the network/type prefix byte.
pub const PREFIX_SIZE: usize = 1;

/// Size of the short payment id carried by integrated addresses.
pub const PAYMENT_ID_SIZE: usize = 8;

/// Size of the legacy long payment id.
pub const LONG_PAYMENT_ID_SIZE: usize = 32;

/// Offset of the public spend key inside a decoded address.
pub const SPEND_KEY_OFFSET: usize = PREFIX_SIZE;

/// Offset of the public view key inside a decoded address.
pub const VIEW_KEY_OFFSET: usize = SPEND_KEY_OFFSET + KEY_SIZE;

/// Offset of the payment id inside a decoded integrated address.
pub const PAYMENT_ID_OFFSET: usize = VIEW_KEY_OFFSET + KEY_SIZE;

/// Decoded size of a primary or sub address.
/// 1 + 32 + 32 + 4 = 69 bytes
pub const ADDRESS_DECODED_SIZE: usize = PREFIX_SIZE + 2 * KEY_SIZE + CHECKSUM_SIZE;

/// Decoded size of an integrated address.
/// 1 + 32 + 32 + 8 + 4 = 77 bytes
pub const INTEGRATED_ADDRESS_DECODED_SIZE: usize = ADDRESS_DECODED_SIZE + PAYMENT_ID_SIZE;

/// Length of an encoded primary or sub address, in characters.
pub const ADDRESS_SIZE: usize = 95;

/// Length of an encoded integrated address, in characters.
pub const INTEGRATED_ADDRESS_SIZE: usize = 106;

// ═══════════════════════════════════════════════════════════════════════════════
// BLOCK BASE58
// ═══════════════════════════════════════════════════════════════════════════════

/// Raw bytes per full Base58 block.
pub const BASE58_FULL_BLOCK_SIZE: usize = 8;

/// Encoded characters per full Base58 block.
pub const BASE58_ENCODED_BLOCK_SIZE: usize = 11;

/// Encoded width of a block, indexed by its raw byte length (0..=8).
pub const BASE58_ENCODED_BLOCK_SIZES: [usize; BASE58_FULL_BLOCK_SIZE + 1] =
    [0, 2, 3, 5, 6, 7, 9, 10, 11];

/// The Base58 zero digit, used to left-pad encoded blocks.
pub const BASE58_ZERO_DIGIT: char = '1';

// ═══════════════════════════════════════════════════════════════════════════════
// HASH PREFIXES
// ═══════════════════════════════════════════════════════════════════════════════

/// Prefix of the view tag hash input.
pub const VIEW_TAG_PREFIX: &[u8] = b"view_tag";

/// Prefix of the amount keystream hash input.
pub const AMOUNT_PREFIX: &[u8] = b"amount";

/// Prefix of the subaddress secret hash input (NUL terminated).
pub const SUBADDRESS_PREFIX: &[u8] = b"SubAddr\x00";

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSACTION EXTRA
// ═══════════════════════════════════════════════════════════════════════════════

/// Extra field tags accepted at offset 0.
pub const EXTRA_TAGS: [u8; 2] = [0x01, 0x02];

/// Minimum extra length holding a transaction public key.
pub const EXTRA_TX_PUBKEY_END: usize = PREFIX_SIZE + KEY_SIZE;

/// Start of the encrypted payment id inside the extra field.
pub const EXTRA_PAYMENT_ID_START: usize = 36;

/// Minimum extra length holding an encrypted payment id.
pub const EXTRA_PAYMENT_ID_END: usize = EXTRA_PAYMENT_ID_START + PAYMENT_ID_SIZE;

/// Byte appended to the shared secret when deriving the payment id keystream.
pub const ENCRYPTED_PAYMENT_ID_TAIL: u8 = 0x8d;

// ═══════════════════════════════════════════════════════════════════════════════
// AMOUNTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Atomic units per XMR.
pub const ATOMIC_UNITS_PER_XMR: u64 = 1_000_000_000_000;

/// Number of decimal places in the display unit.
pub const DISPLAY_DECIMALS: usize = 12;

/// Maximum length of an encrypted amount in bytes.
pub const MAX_ENCRYPTED_AMOUNT_SIZE: usize = 8;

// ═══════════════════════════════════════════════════════════════════════════════
// VIEW TAGS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a view tag in bytes.
pub const VIEW_TAG_SIZE: usize = 1;

/// Number of possible view tag values.
pub const VIEW_TAG_SPACE: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_layout_sizes() {
        assert_eq!(ADDRESS_DECODED_SIZE, 69);
        assert_eq!(INTEGRATED_ADDRESS_DECODED_SIZE, 77);
        assert_eq!(PAYMENT_ID_OFFSET, 65);
        assert_eq!(EXTRA_TX_PUBKEY_END, 33);
        assert_eq!(EXTRA_PAYMENT_ID_END, 44);
    }

    #[test]
    fn test_encoded_sizes_match_block_layout() {
        // 8 full blocks + a 5 byte tail
        let full = ADDRESS_DECODED_SIZE / BASE58_FULL_BLOCK_SIZE;
        let tail = ADDRESS_DECODED_SIZE % BASE58_FULL_BLOCK_SIZE;
        assert_eq!(
            full * BASE58_ENCODED_BLOCK_SIZE + BASE58_ENCODED_BLOCK_SIZES[tail],
            ADDRESS_SIZE
        );

        let full = INTEGRATED_ADDRESS_DECODED_SIZE / BASE58_FULL_BLOCK_SIZE;
        let tail = INTEGRATED_ADDRESS_DECODED_SIZE % BASE58_FULL_BLOCK_SIZE;
        assert_eq!(
            full * BASE58_ENCODED_BLOCK_SIZE + BASE58_ENCODED_BLOCK_SIZES[tail],
            INTEGRATED_ADDRESS_SIZE
        );
    }

    #[test]
    fn test_hash_prefixes_unique() {
        let prefixes = [VIEW_TAG_PREFIX, AMOUNT_PREFIX, SUBADDRESS_PREFIX];
        for (i, a) in prefixes.iter().enumerate() {
            for (j, b) in prefixes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
        assert_eq!(SUBADDRESS_PREFIX.len(), 8);
    }
}
