//! Collaborator interfaces for xmrkit.
//!
//! The library never talks to a node itself; anything that can hand over
//! transactions (an RPC client, a file, a test fixture) implements
//! [`TransactionSource`].

use std::ops::Range;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::LedgerTransaction;

// ═══════════════════════════════════════════════════════════════════════════════
// TRANSACTION SOURCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Supplies ledger transactions for scanning.
///
/// Implementations might use:
/// - A daemon JSON-RPC client
/// - A JSON dump on disk
/// - In-memory fixtures (for testing)
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Returns the height of the next block to be mined.
    async fn chain_height(&self) -> Result<u64>;

    /// Returns all transactions mined in the given block height range.
    async fn transactions_in_range(&self, heights: Range<u64>) -> Result<Vec<LedgerTransaction>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCAN PROGRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// Progress update during scanning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanProgress {
    /// Block heights to scan
    pub total: u64,
    /// Block heights scanned so far
    pub scanned: u64,
    /// Outputs that passed the view tag filter so far
    pub view_tag_matches: u64,
    /// Owned outputs found so far
    pub owned: u64,
}

impl ScanProgress {
    /// Returns completion as a fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.scanned as f64 / self.total as f64
        }
    }
}

/// Callback for scan progress updates.
pub type ProgressCallback = Box<dyn Fn(ScanProgress) + Send + Sync>;
