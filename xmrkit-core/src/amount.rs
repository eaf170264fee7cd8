//! Conversions between atomic units and the XMR display unit.
//!
//! 1 XMR = 10^12 atomic units. Decimal rendering is exact; the float
//! conversions are lossy and meant for display only.

use crate::constants::{ATOMIC_UNITS_PER_XMR, DISPLAY_DECIMALS};

/// Renders an atomic amount as a decimal XMR string with all 12 decimals.
///
/// The integer part always has at least one digit.
///
/// # Example
/// ```
/// use xmrkit_core::amount::xmr_to_decimal;
///
/// assert_eq!(xmr_to_decimal(34_000_200_000), "0.034000200000");
/// ```
pub fn xmr_to_decimal(atomic: u64) -> String {
    let digits = format!("{:0width$}", atomic, width = DISPLAY_DECIMALS + 1);
    let (whole, fraction) = digits.split_at(digits.len() - DISPLAY_DECIMALS);
    format!("{}.{}", whole, fraction)
}

/// Converts an atomic amount to XMR as a float.
pub fn xmr_to_float(atomic: u64) -> f64 {
    atomic as f64 / ATOMIC_UNITS_PER_XMR as f64
}

/// Converts an XMR float to atomic units, truncating toward zero.
///
/// Negative and NaN inputs yield 0; values beyond `u64::MAX` saturate.
pub fn float_to_xmr(xmr: f64) -> u64 {
    (xmr * ATOMIC_UNITS_PER_XMR as f64) as u64
}
