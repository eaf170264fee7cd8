//! Error types for xmrkit.
//!
//! One error hierarchy for the whole workspace, built with `thiserror`.
//! Every operation over malformed input returns one of these; none panics.

use thiserror::Error;

/// Result type alias using `XmrError`.
pub type Result<T> = std::result::Result<T, XmrError>;

/// Main error type for all xmrkit operations.
#[derive(Debug, Error)]
pub enum XmrError {
    // ═══════════════════════════════════════════════════════════════════════════
    // ENCODING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Malformed hex string.
    #[error("Invalid hex encoding: {0}")]
    InvalidHexEncoding(#[from] hex::FromHexError),

    /// Scalar not canonical, or bytes that do not decode to a curve point.
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // ADDRESS ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Address string (or decoded buffer) has the wrong length.
    #[error("Invalid address length: {actual}")]
    InvalidAddressLength { actual: usize },

    /// Address checksum does not match its payload.
    #[error("Invalid address checksum")]
    InvalidAddressChecksum,

    /// Address prefix byte is not in the prefix table.
    #[error("Invalid address prefix: {0:#04x}")]
    InvalidAddressPrefix(u8),

    /// Address contains characters outside the Base58 alphabet, or a block
    /// whose value overflows its width.
    #[error("Invalid address encoding: {0}")]
    InvalidAddressEncoding(String),

    /// Address is valid but of a different kind than the operation needs.
    #[error("Invalid address type: expected {expected}, got {actual}")]
    InvalidAddressType { expected: String, actual: String },

    // ═══════════════════════════════════════════════════════════════════════════
    // TRANSACTION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// First byte of the extra field is not an accepted tag.
    #[error("Invalid extra tag: {0:#04x}")]
    InvalidExtraTag(u8),

    /// Extra field too short for the requested component.
    #[error("Invalid extra length: need at least {required} bytes, got {actual}")]
    InvalidExtraLength { required: usize, actual: usize },

    /// Encrypted amount is empty or longer than 8 bytes.
    #[error("Invalid encrypted amount: {0}")]
    InvalidAmountEncoding(String),

    /// View tag is not exactly one byte.
    #[error("Invalid view tag: {0}")]
    InvalidViewTag(String),

    /// Payment parameters that cannot form a transaction.
    #[error("Validation error: {0}")]
    ValidationError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // LOOKUP ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Network or address type outside the prefix table.
    #[error("Invalid network or address type: {0}")]
    InvalidNetworkOrAddressType(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // COLLABORATOR ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A transaction source failed to deliver data.
    #[error("Transaction source error: {0}")]
    SourceError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl XmrError {
    /// Returns true if this error came from address decoding or validation.
    pub fn is_address_error(&self) -> bool {
        matches!(
            self,
            XmrError::InvalidAddressLength { .. }
                | XmrError::InvalidAddressChecksum
                | XmrError::InvalidAddressPrefix(_)
                | XmrError::InvalidAddressEncoding(_)
                | XmrError::InvalidAddressType { .. }
        )
    }

    /// Returns true if this is a key encoding error.
    pub fn is_key_error(&self) -> bool {
        matches!(self, XmrError::InvalidKeyEncoding(_))
    }

    /// Returns true if the error was caused by malformed caller input.
    ///
    /// Everything except collaborator failures qualifies; retrying with the
    /// same input yields the same error.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, XmrError::SourceError(_))
    }
}
