//! Monero block Base58.
//!
//! Plain Base58 treats the whole input as one big integer. Monero instead
//! splits the input into 8-byte blocks and encodes each block on its own
//! into a fixed number of characters, so every address has a fixed length.
//!
//! ```text
//! bytes:   [8][8][8][8][8][8][8][8][5]
//! chars:   [11][11][11][11][11][11][11][11][7]
//! ```
//!
//! Each block goes through `bs58` with the Bitcoin alphabet and is then
//! normalized to its fixed width.

use xmrkit_core::constants::{
    BASE58_ENCODED_BLOCK_SIZE, BASE58_ENCODED_BLOCK_SIZES, BASE58_FULL_BLOCK_SIZE,
    BASE58_ZERO_DIGIT,
};
use xmrkit_core::error::{Result, XmrError};

// ═══════════════════════════════════════════════════════════════════════════════
// BLOCKS
// ═══════════════════════════════════════════════════════════════════════════════

/// Encodes one block of at most 8 bytes, left-padded with `'1'` to the fixed
/// width for its length.
pub fn encode_block(block: &[u8]) -> String {
    debug_assert!(block.len() <= BASE58_FULL_BLOCK_SIZE);
    let width = BASE58_ENCODED_BLOCK_SIZES[block.len()];
    let encoded = bs58::encode(block).into_string();

    if encoded.len() >= width {
        // Only leading zero digits can exceed the width
        return encoded[encoded.len() - width..].to_string();
    }

    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat(BASE58_ZERO_DIGIT).take(width - encoded.len()));
    out.push_str(&encoded);
    out
}

/// Decodes one encoded block into exactly `size` bytes.
///
/// # Errors
/// Returns `InvalidAddressEncoding` for characters outside the alphabet or a
/// value that does not fit in `size` bytes.
pub fn decode_block(chunk: &[u8], size: usize) -> Result<Vec<u8>> {
    let decoded = bs58::decode(chunk)
        .into_vec()
        .map_err(|e| XmrError::InvalidAddressEncoding(e.to_string()))?;

    if decoded.len() <= size {
        let mut out = vec![0u8; size - decoded.len()];
        out.extend_from_slice(&decoded);
        return Ok(out);
    }

    let (excess, value) = decoded.split_at(decoded.len() - size);
    if excess.iter().any(|&b| b != 0) {
        return Err(XmrError::InvalidAddressEncoding(format!(
            "block overflows {} bytes",
            size
        )));
    }
    Ok(value.to_vec())
}

/// Returns the raw byte length of a trailing block of `encoded_len` characters.
fn decoded_tail_size(encoded_len: usize) -> Option<usize> {
    BASE58_ENCODED_BLOCK_SIZES
        .iter()
        .position(|&width| width == encoded_len)
}

// ═══════════════════════════════════════════════════════════════════════════════
// BUFFERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Encodes a buffer block by block.
pub fn encode(data: &[u8]) -> String {
    data.chunks(BASE58_FULL_BLOCK_SIZE).map(encode_block).collect()
}

/// Returns the encoded length of a buffer of `len` bytes.
pub fn encoded_len(len: usize) -> usize {
    (len / BASE58_FULL_BLOCK_SIZE) * BASE58_ENCODED_BLOCK_SIZE
        + BASE58_ENCODED_BLOCK_SIZES[len % BASE58_FULL_BLOCK_SIZE]
}

/// Decodes a block Base58 string.
///
/// # Errors
/// Returns `InvalidAddressEncoding` for non-ASCII input, characters outside
/// the alphabet, an impossible trailing block length, or an overflowing block.
pub fn decode(s: &str) -> Result<Vec<u8>> {
    if !s.is_ascii() {
        return Err(XmrError::InvalidAddressEncoding(
            "non-ASCII character".into(),
        ));
    }

    let raw = s.as_bytes();
    let tail_len = raw.len() % BASE58_ENCODED_BLOCK_SIZE;
    let tail_size = decoded_tail_size(tail_len).ok_or_else(|| {
        XmrError::InvalidAddressEncoding(format!("invalid trailing block length {}", tail_len))
    })?;

    let full_blocks = raw.len() / BASE58_ENCODED_BLOCK_SIZE;
    let mut out = Vec::with_capacity(full_blocks * BASE58_FULL_BLOCK_SIZE + tail_size);

    for chunk in raw.chunks(BASE58_ENCODED_BLOCK_SIZE) {
        let size = if chunk.len() == BASE58_ENCODED_BLOCK_SIZE {
            BASE58_FULL_BLOCK_SIZE
        } else {
            tail_size
        };
        out.extend(decode_block(chunk, size)?);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_block_widths() {
        for len in 0..=BASE58_FULL_BLOCK_SIZE {
            let zeros = vec![0u8; len];
            let max = vec![0xffu8; len];
            assert_eq!(encode_block(&zeros).len(), BASE58_ENCODED_BLOCK_SIZES[len]);
            assert_eq!(encode_block(&max).len(), BASE58_ENCODED_BLOCK_SIZES[len]);
        }
    }

    #[test]
    fn test_zero_block_is_all_ones() {
        assert_eq!(encode_block(&[0u8; 8]), "11111111111");
        assert_eq!(decode_block(b"11111111111", 8).unwrap(), vec![0u8; 8]);
    }

    #[test]
    fn test_leading_zero_bytes_preserved() {
        let block = [0, 0, 0, 0, 0, 0, 0, 1];
        let encoded = encode_block(&block);
        assert_eq!(encoded, "11111111112");
        assert_eq!(decode_block(encoded.as_bytes(), 8).unwrap(), block);
    }

    #[test]
    fn test_overflowing_block_rejected() {
        // 58^11 - 1 > 2^64
        assert!(matches!(
            decode_block(b"zzzzzzzzzzz", 8),
            Err(XmrError::InvalidAddressEncoding(_))
        ));
    }

    #[test]
    fn test_invalid_characters_rejected() {
        // '0', 'O', 'I' and 'l' are not in the alphabet
        for bad in ["0", "O", "I", "l"] {
            let s = format!("{}1111111111", bad);
            assert!(matches!(
                decode(&s),
                Err(XmrError::InvalidAddressEncoding(_))
            ));
        }
        assert!(decode("é1111111111").is_err());
    }

    #[test]
    fn test_invalid_tail_length_rejected() {
        // a 4 character tail maps to no byte length
        assert!(decode("1111").is_err());
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(encoded_len(69), 95);
        assert_eq!(encoded_len(77), 106);
        assert_eq!(encode(&[7u8; 69]).len(), 95);
    }

    proptest! {
        #[test]
        fn test_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..128)) {
            let encoded = encode(&data);
            prop_assert_eq!(encoded.len(), encoded_len(data.len()));
            prop_assert_eq!(decode(&encoded).unwrap(), data);
        }
    }
}
