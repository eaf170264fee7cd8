//! Transaction records as delivered by a Monero daemon.
//!
//! Keys, view tags and encrypted amounts stay hex strings here; parsing into
//! curve types happens per output during scanning so that one malformed
//! output never poisons the rest of the transaction.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One output of a ledger transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerOutput {
    /// One-time output public key (hex). Absent on some pre-RingCT outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// One-byte view tag (2 hex chars), present on outputs since the view tag fork
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_tag: Option<String>,
    /// Encrypted amount from the RingCT ECDH info (hex, up to 8 bytes)
    pub amount: String,
}

impl LedgerOutput {
    /// Creates an output without a view tag.
    pub fn new(key: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            view_tag: None,
            amount: amount.into(),
        }
    }

    /// Attaches a view tag.
    pub fn with_view_tag(mut self, view_tag: impl Into<String>) -> Self {
        self.view_tag = Some(view_tag.into());
        self
    }

    /// Returns true if the output carries a view tag.
    pub fn has_view_tag(&self) -> bool {
        self.view_tag.is_some()
    }
}

/// A transaction from the ledger, reduced to what output scanning needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// Transaction hash (hex)
    pub hash: String,
    /// Block height the transaction was mined in
    #[serde(default)]
    pub block_height: u64,
    /// Raw extra field
    pub extra: Vec<u8>,
    /// Outputs in on-chain order; position is the output index
    pub outputs: Vec<LedgerOutput>,
}

impl LedgerTransaction {
    /// Creates a transaction record.
    pub fn new(hash: impl Into<String>, extra: Vec<u8>, outputs: Vec<LedgerOutput>) -> Self {
        Self {
            hash: hash.into(),
            block_height: 0,
            extra,
            outputs,
        }
    }

    /// Sets the block height.
    pub fn at_height(mut self, block_height: u64) -> Self {
        self.block_height = block_height;
        self
    }

    /// Parses a JSON array of transactions.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes a list of transactions to pretty JSON.
    pub fn list_to_json(txs: &[Self]) -> Result<String> {
        Ok(serde_json::to_string_pretty(txs)?)
    }
}
