//! View tag computation for efficient scanning.
//!
//! Every output since the view tag fork carries one byte derived from the
//! shared secret:
//!
//! ```text
//! view_tag = keccak256("view_tag" || S || index)[0]
//! ```
//!
//! A receiver recomputes it with one scalar multiplication and one hash and
//! skips the output on mismatch, avoiding the hash-to-scalar and base point
//! multiplication of the full ownership check for ~255/256 of all outputs.
//!
//! ## Security
//!
//! A view tag leaks 8 bits of a hash of the shared secret. It never yields a
//! false negative, so filtering on it is always sound.

use subtle::ConstantTimeEq;

use xmrkit_core::constants::{VIEW_TAG_PREFIX, VIEW_TAG_SIZE, VIEW_TAG_SPACE};
use xmrkit_core::error::{Result, XmrError};

use crate::derive::SharedSecret;
use crate::hash::keccak256_concat;

/// Encodes an output index as minimal little-endian bytes (at least one byte).
///
/// Indices below 128 encode to the same single byte as Monero's varint.
pub fn encode_output_index(index: u64) -> Vec<u8> {
    let bytes = index.to_le_bytes();
    let len = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(1, |last| last + 1);
    bytes[..len].to_vec()
}

/// Computes the view tag of output `index` for a shared secret.
pub fn compute_view_tag(shared_secret: &SharedSecret, index: u64) -> u8 {
    let index_bytes = encode_output_index(index);
    keccak256_concat(&[VIEW_TAG_PREFIX, shared_secret.as_bytes(), &index_bytes])[0]
}

/// Checks a view tag in constant time.
pub fn verify_view_tag(shared_secret: &SharedSecret, index: u64, expected_tag: u8) -> bool {
    let computed_tag = compute_view_tag(shared_secret, index);
    computed_tag.ct_eq(&expected_tag).into()
}

/// Parses a view tag given as hex (exactly one byte).
///
/// # Errors
/// Returns `InvalidHexEncoding` for malformed hex, `InvalidViewTag` for any
/// length other than one byte.
pub fn parse_view_tag(s: &str) -> Result<u8> {
    let bytes = hex::decode(s)?;
    if bytes.len() != VIEW_TAG_SIZE {
        return Err(XmrError::InvalidViewTag(format!(
            "expected {} byte, got {}",
            VIEW_TAG_SIZE,
            bytes.len()
        )));
    }
    Ok(bytes[0])
}

/// Computes view tag statistics.
///
/// Useful for checking that observed tags are uniformly distributed.
#[derive(Debug, Clone)]
pub struct ViewTagStats {
    /// Count of each view tag value
    pub distribution: Vec<u64>,
    /// Total number of tags analyzed
    pub total: u64,
}

impl Default for ViewTagStats {
    fn default() -> Self {
        Self {
            distribution: vec![0; VIEW_TAG_SPACE],
            total: 0,
        }
    }
}

impl ViewTagStats {
    /// Creates a new stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a view tag.
    pub fn add(&mut self, tag: u8) {
        self.distribution[tag as usize] += 1;
        self.total += 1;
    }

    /// Returns the expected count per tag for uniform distribution.
    pub fn expected_uniform_count(&self) -> f64 {
        self.total as f64 / VIEW_TAG_SPACE as f64
    }

    /// Computes the chi-squared statistic against the uniform distribution.
    pub fn chi_squared(&self) -> f64 {
        let expected = self.expected_uniform_count();
        if expected == 0.0 {
            return 0.0;
        }

        self.distribution
            .iter()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                (diff * diff) / expected
            })
            .sum()
    }
}
