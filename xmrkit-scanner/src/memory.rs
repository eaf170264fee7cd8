//! In-memory transaction source.
//!
//! Holds transactions in block order. Good for tests, fixtures loaded from a
//! JSON dump, and offline scans from the CLI.

use std::ops::Range;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use xmrkit_core::error::{Result, XmrError};
use xmrkit_core::traits::TransactionSource;
use xmrkit_core::types::LedgerTransaction;

/// In-memory [`TransactionSource`].
#[derive(Debug, Default)]
pub struct MemorySource {
    /// Transactions sorted by block height (stable within a block)
    transactions: RwLock<Vec<LedgerTransaction>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source holding `transactions`.
    pub fn from_transactions(transactions: Vec<LedgerTransaction>) -> Self {
        let source = Self::new();
        source.extend(transactions);
        source
    }

    /// Loads a JSON array of transactions.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_transactions(LedgerTransaction::list_from_json(json)?))
    }

    /// Loads a JSON array of transactions from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| XmrError::SourceError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Adds one transaction.
    pub fn push(&self, transaction: LedgerTransaction) {
        self.extend(std::iter::once(transaction));
    }

    /// Adds transactions, keeping block order.
    pub fn extend(&self, transactions: impl IntoIterator<Item = LedgerTransaction>) {
        let mut all = self.transactions.write();
        all.extend(transactions);
        all.sort_by_key(|tx| tx.block_height);
    }

    /// Returns the number of transactions held.
    pub fn len(&self) -> usize {
        self.transactions.read().len()
    }

    /// Returns true if no transactions are held.
    pub fn is_empty(&self) -> bool {
        self.transactions.read().is_empty()
    }

    /// Removes all transactions.
    pub fn clear(&self) {
        self.transactions.write().clear();
    }
}

#[async_trait]
impl TransactionSource for MemorySource {
    async fn chain_height(&self) -> Result<u64> {
        Ok(self
            .transactions
            .read()
            .last()
            .map_or(0, |tx| tx.block_height + 1))
    }

    #[instrument(skip(self))]
    async fn transactions_in_range(&self, heights: Range<u64>) -> Result<Vec<LedgerTransaction>> {
        let found: Vec<LedgerTransaction> = self
            .transactions
            .read()
            .iter()
            .filter(|tx| heights.contains(&tx.block_height))
            .cloned()
            .collect();
        debug!(count = found.len(), "Fetched transactions");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(hash: &str, height: u64) -> LedgerTransaction {
        LedgerTransaction::new(hash, vec![], vec![]).at_height(height)
    }

    #[tokio::test]
    async fn test_empty_source() {
        let source = MemorySource::new();
        assert!(source.is_empty());
        assert_eq!(source.chain_height().await.unwrap(), 0);
        assert!(source.transactions_in_range(0..100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_range_query() {
        let source = MemorySource::from_transactions(vec![tx("c", 30), tx("a", 10), tx("b", 20)]);
        assert_eq!(source.len(), 3);
        assert_eq!(source.chain_height().await.unwrap(), 31);

        let found = source.transactions_in_range(10..30).await.unwrap();
        let hashes: Vec<&str> = found.iter().map(|tx| tx.hash.as_str()).collect();
        assert_eq!(hashes, vec!["a", "b"]);
    }

    #[test]
    fn test_push_keeps_order() {
        let source = MemorySource::new();
        source.push(tx("late", 5));
        source.push(tx("early", 1));

        let found = tokio_test::block_on(source.transactions_in_range(0..10)).unwrap();
        assert_eq!(found[0].hash, "early");

        source.clear();
        assert!(source.is_empty());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[{ "hash": "aa", "block_height": 4, "extra": [], "outputs": [] }]"#;
        let source = MemorySource::from_json(json).unwrap();
        assert_eq!(source.len(), 1);
        assert!(MemorySource::from_json("[").is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = MemorySource::from_json_file("/nonexistent/xmrkit/txs.json");
        assert!(matches!(result, Err(XmrError::SourceError(_))));
    }
}
