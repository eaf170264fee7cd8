//! Output discovery (recipient scan).
//!
//! Two checks decide whether an output pays us:
//!
//! 1. **View tag** (optional, cheap): one hash over the shared secret. Rejects
//!    ~255/256 of foreign outputs and never rejects an owned one.
//! 2. **One-time key** (exact): `Hs(S || i)·G + B == P`.
//!
//! The exact check is run once per candidate spend key. Subtracting `Si·G`
//! from the output key once and comparing the remainder against every
//! candidate keeps that loop down to point comparisons.

use xmrkit_core::error::Result;
use xmrkit_core::types::LedgerOutput;
use xmrkit_crypto::{
    decrypt_amount, derivation_scalar, one_time_public_key, parse_view_tag, scalar_base_mult,
    shared_secret, verify_view_tag, PrivateKey, PublicKey, SharedSecret,
};

// ═══════════════════════════════════════════════════════════════════════════════
// SINGLE CHECKS
// ═══════════════════════════════════════════════════════════════════════════════

/// Checks the view tag of output `index`.
///
/// A match is only probable ownership; confirm with [`owns_output`].
pub fn matches_view_tag(view_tag: u8, index: u64, tx_pub: &PublicKey, view: &PrivateKey) -> bool {
    let secret = shared_secret(view, tx_pub);
    verify_view_tag(&secret, index, view_tag)
}

/// Checks a hex view tag of output `index`.
///
/// # Errors
/// Returns an error if `view_tag` is not exactly one hex byte.
pub fn matches_view_tag_hex(
    view_tag: &str,
    index: u64,
    tx_pub: &PublicKey,
    view: &PrivateKey,
) -> Result<bool> {
    Ok(matches_view_tag(parse_view_tag(view_tag)?, index, tx_pub, view))
}

/// Checks whether output `index` with key `out_key` pays `spend_pub`.
pub fn owns_output(
    spend_pub: &PublicKey,
    index: u64,
    out_key: &PublicKey,
    tx_pub: &PublicKey,
    view: &PrivateKey,
) -> bool {
    let secret = shared_secret(view, tx_pub);
    let si = derivation_scalar(&secret, index);
    one_time_public_key(&si, spend_pub) == *out_key
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHECK AND DECRYPT
// ═══════════════════════════════════════════════════════════════════════════════

/// Filters on the view tag and decrypts the amount on a match.
///
/// Returns `(false, 0)` without decrypting on mismatch. A view tag false
/// positive decrypts to a meaningless amount.
///
/// # Errors
/// Returns `InvalidAmountEncoding` for an encrypted amount outside 1..=8 bytes.
pub fn decrypt_if_owned_by_view_tag(
    view_tag: u8,
    index: u64,
    encrypted_amount: &[u8],
    tx_pub: &PublicKey,
    view: &PrivateKey,
) -> Result<(bool, u64)> {
    let secret = shared_secret(view, tx_pub);
    if !verify_view_tag(&secret, index, view_tag) {
        return Ok((false, 0));
    }
    let si = derivation_scalar(&secret, index);
    Ok((true, decrypt_amount(&si, encrypted_amount)?))
}

/// Runs the exact ownership check and decrypts the amount when owned.
///
/// Returns `(false, 0)` without decrypting when not owned.
///
/// # Errors
/// Returns `InvalidAmountEncoding` for an encrypted amount outside 1..=8 bytes.
pub fn decrypt_if_owned_by_spend_key(
    spend_pub: &PublicKey,
    index: u64,
    out_key: &PublicKey,
    encrypted_amount: &[u8],
    tx_pub: &PublicKey,
    view: &PrivateKey,
) -> Result<(bool, u64)> {
    let secret = shared_secret(view, tx_pub);
    let si = derivation_scalar(&secret, index);
    if one_time_public_key(&si, spend_pub) != *out_key {
        return Ok((false, 0));
    }
    Ok((true, decrypt_amount(&si, encrypted_amount)?))
}

/// [`decrypt_if_owned_by_view_tag`] over hex inputs as a daemon delivers them.
///
/// The amount hex is only decoded on a match.
pub fn decrypt_if_owned_by_view_tag_hex(
    view_tag: &str,
    index: u64,
    encrypted_amount: &str,
    tx_pub: &PublicKey,
    view: &PrivateKey,
) -> Result<(bool, u64)> {
    let tag = parse_view_tag(view_tag)?;
    let secret = shared_secret(view, tx_pub);
    if !verify_view_tag(&secret, index, tag) {
        return Ok((false, 0));
    }
    let si = derivation_scalar(&secret, index);
    Ok((true, decrypt_amount(&si, &hex::decode(encrypted_amount)?)?))
}

/// [`decrypt_if_owned_by_spend_key`] over a hex amount.
///
/// The amount hex is only decoded when the output is owned.
pub fn decrypt_if_owned_by_spend_key_hex(
    spend_pub: &PublicKey,
    index: u64,
    out_key: &PublicKey,
    encrypted_amount: &str,
    tx_pub: &PublicKey,
    view: &PrivateKey,
) -> Result<(bool, u64)> {
    let secret = shared_secret(view, tx_pub);
    let si = derivation_scalar(&secret, index);
    if one_time_public_key(&si, spend_pub) != *out_key {
        return Ok((false, 0));
    }
    Ok((true, decrypt_amount(&si, &hex::decode(encrypted_amount)?)?))
}

// ═══════════════════════════════════════════════════════════════════════════════
// LEDGER OUTPUTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of scanning one ledger output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputScan {
    /// The output carries no one-time key
    MissingKey,
    /// View tag didn't match - not for this recipient
    FilteredByViewTag,
    /// Passed the filter (or had no tag) but matches no candidate
    NotOwned,
    /// Pays the candidate spend key at `candidate`
    Owned {
        /// Index into the candidate list
        candidate: usize,
        /// One-time output key
        output_key: PublicKey,
        /// Decrypted amount in atomic units
        amount: u64,
    },
}

impl OutputScan {
    /// Returns true if the output is owned.
    pub fn is_owned(&self) -> bool {
        matches!(self, OutputScan::Owned { .. })
    }

    /// Returns the decrypted amount of an owned output.
    pub fn amount(&self) -> Option<u64> {
        match self {
            OutputScan::Owned { amount, .. } => Some(*amount),
            _ => None,
        }
    }

    /// Returns true if the output got past the view tag filter.
    pub fn passed_view_tag(&self) -> bool {
        matches!(self, OutputScan::NotOwned | OutputScan::Owned { .. })
    }
}

/// Scans one ledger output against candidate spend keys.
///
/// With `use_view_tag` set, a present view tag is checked first. The exact
/// check then tries every candidate (primary and subaddress spend keys).
///
/// # Errors
/// Malformed hex, an invalid view tag, an output key that is not a point, or
/// a bad encrypted amount length.
pub fn scan_output(
    output: &LedgerOutput,
    index: u64,
    tx_pub: &PublicKey,
    view: &PrivateKey,
    candidates: &[PublicKey],
    use_view_tag: bool,
) -> Result<OutputScan> {
    let secret = shared_secret(view, tx_pub);
    scan_output_with_secret(output, index, &secret, candidates, use_view_tag)
}

/// [`scan_output`] with a shared secret already computed for the transaction.
pub fn scan_output_with_secret(
    output: &LedgerOutput,
    index: u64,
    secret: &SharedSecret,
    candidates: &[PublicKey],
    use_view_tag: bool,
) -> Result<OutputScan> {
    let key = match output.key.as_deref() {
        Some(key) if !key.is_empty() => key,
        _ => return Ok(OutputScan::MissingKey),
    };

    if use_view_tag {
        if let Some(tag) = output.view_tag.as_deref() {
            if !verify_view_tag(secret, index, parse_view_tag(tag)?) {
                return Ok(OutputScan::FilteredByViewTag);
            }
        }
    }

    let out_key = PublicKey::from_hex(key)?;
    let si = derivation_scalar(secret, index);

    // P - Si·G is the spend key the output pays
    let spend = PublicKey::from_point(out_key.as_point() - scalar_base_mult(&si));
    let Some(candidate) = candidates.iter().position(|c| *c == spend) else {
        return Ok(OutputScan::NotOwned);
    };

    let amount = decrypt_amount(&si, &hex::decode(&output.amount)?)?;
    Ok(OutputScan::Owned {
        candidate,
        output_key: out_key,
        amount,
    })
}
