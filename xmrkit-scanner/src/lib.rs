//! # xmrkit Scanner
//!
//! Batch scanning of ledger transactions to discover owned outputs.
//!
//! ## Features
//!
//! - **View Tag Filtering**: most foreign outputs cost one hash
//! - **Subaddress Lookup**: one exact check covers every candidate address
//! - **Failure Isolation**: a malformed output never aborts the rest of a scan
//! - **Parallel Scanning**: optional `rayon` sharding of transaction lists
//! - **Progress Reporting**: callbacks for UI progress updates
//!
//! ## Example
//!
//! ```rust
//! use xmrkit_core::types::NetworkType;
//! use xmrkit_scanner::Scanner;
//! use xmrkit_stealth::{FullKeyPair, StealthPaymentBuilder};
//!
//! let wallet = FullKeyPair::generate();
//! let address = wallet.primary_address(NetworkType::Mainnet);
//!
//! let payment = StealthPaymentBuilder::new()
//!     .recipient(address.clone(), 1_000_000)
//!     .build()
//!     .unwrap();
//! let tx = payment.to_transaction("c0ffee");
//!
//! let scanner = Scanner::new(wallet.view_only(), vec![address]);
//! let scan = scanner.scan_transaction(&tx).unwrap();
//! assert_eq!(scan.total_received(), 1_000_000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod memory;
pub mod stats;

use std::ops::Range;
use std::time::Instant;

use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use xmrkit_core::constants::PAYMENT_ID_SIZE;
use xmrkit_core::error::{Result, XmrError};
use xmrkit_core::traits::{ProgressCallback, ScanProgress, TransactionSource};
use xmrkit_core::types::{LedgerTransaction, NetworkType};
use xmrkit_crypto::{shared_secret, PublicKey};
use xmrkit_stealth::{
    encrypt_payment_id, get_payment_id, get_tx_public_key, scan_output_with_secret, MoneroAddress,
    OutputScan, ViewOnlyKeyPair,
};

pub use memory::MemorySource;
pub use stats::ScanStats;

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Scanner configuration.
#[derive(Clone, Debug)]
pub struct ScannerConfig {
    /// Abort on the first malformed output or transaction
    pub fail_fast: bool,
    /// Check view tags before the exact ownership check
    pub use_view_tags: bool,
    /// Scan transaction lists on the rayon thread pool
    pub parallel: bool,
    /// Owned outputs below this amount (atomic units) are reported separately
    pub min_amount: u64,
    /// Block heights fetched per source request
    pub batch_size: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            use_view_tags: true,
            parallel: false,
            min_amount: 0,
            batch_size: 100,
        }
    }
}

impl ScannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables aborting on the first failure.
    pub fn fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Disables the view tag filter.
    pub fn without_view_tags(mut self) -> Self {
        self.use_view_tags = false;
        self
    }

    /// Enables parallel scanning.
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    /// Sets the minimum reported amount.
    pub fn min_amount(mut self, amount: u64) -> Self {
        self.min_amount = amount;
        self
    }

    /// Sets the number of block heights fetched per request (at least 1).
    pub fn batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// An output found to pay one of the scanner's addresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedOutput {
    /// Hash of the containing transaction
    pub tx_hash: String,
    /// Block height of the containing transaction
    pub block_height: u64,
    /// Output index within the transaction
    pub index: u64,
    /// One-time output key
    pub output_key: PublicKey,
    /// The address the output pays
    pub address: MoneroAddress,
    /// Decrypted amount in atomic units
    pub amount: u64,
}

/// Result of scanning one output.
#[derive(Debug)]
pub enum OutputOutcome {
    /// Owned and at or above the minimum amount
    Owned(OwnedOutput),
    /// Owned but below the minimum amount
    BelowMinimum(OwnedOutput),
    /// Passed the filter but pays none of our addresses
    NotOwned,
    /// Rejected by the view tag
    FilteredByViewTag,
    /// Output carries no one-time key
    MissingKey,
    /// Malformed output data
    Failed(XmrError),
}

impl OutputOutcome {
    /// Returns the owned output, if any (below-minimum outputs included).
    pub fn owned_output(&self) -> Option<&OwnedOutput> {
        match self {
            OutputOutcome::Owned(output) | OutputOutcome::BelowMinimum(output) => Some(output),
            _ => None,
        }
    }

    /// Returns true if the output failed to scan.
    pub fn is_failure(&self) -> bool {
        matches!(self, OutputOutcome::Failed(_))
    }
}

/// Result of scanning one transaction.
#[derive(Debug)]
pub struct TransactionScan {
    /// Transaction hash
    pub hash: String,
    /// Block height
    pub block_height: u64,
    /// Transaction public key, when the extra field held one
    pub tx_public_key: Option<PublicKey>,
    /// Decrypted payment id, when an owned output is present
    pub payment_id: Option<[u8; PAYMENT_ID_SIZE]>,
    /// One outcome per output, in output order
    pub outcomes: Vec<OutputOutcome>,
    /// Transaction-level failure (no outcomes are present then)
    pub error: Option<XmrError>,
}

impl TransactionScan {
    fn failed(tx: &LedgerTransaction, error: XmrError) -> Self {
        Self {
            hash: tx.hash.clone(),
            block_height: tx.block_height,
            tx_public_key: None,
            payment_id: None,
            outcomes: Vec::new(),
            error: Some(error),
        }
    }

    /// Iterates over owned outputs at or above the minimum amount.
    pub fn owned(&self) -> impl Iterator<Item = &OwnedOutput> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            OutputOutcome::Owned(output) => Some(output),
            _ => None,
        })
    }

    /// Returns the sum of owned amounts.
    pub fn total_received(&self) -> u64 {
        self.owned().fold(0u64, |sum, output| sum.saturating_add(output.amount))
    }

    /// Returns true if anything in the transaction pays us.
    pub fn is_relevant(&self) -> bool {
        self.outcomes.iter().any(|o| o.owned_output().is_some())
    }

    /// Returns the number of failed outputs.
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNER
// ═══════════════════════════════════════════════════════════════════════════════

/// Main scanner for discovering owned outputs.
pub struct Scanner {
    /// View key and primary spend key
    keys: ViewOnlyKeyPair,
    /// Addresses to match outputs against
    candidates: Vec<MoneroAddress>,
    /// Spend keys of `candidates`, same order
    spend_keys: Vec<PublicKey>,
    /// Scan configuration
    config: ScannerConfig,
    /// Scan statistics
    stats: RwLock<ScanStats>,
}

impl Scanner {
    /// Creates a scanner matching outputs against `candidates`.
    ///
    /// Candidates must belong to `keys`' account (primary or subaddresses);
    /// addresses of other accounts never match since their view keys differ.
    pub fn new(keys: ViewOnlyKeyPair, candidates: Vec<MoneroAddress>) -> Self {
        Self::with_config(keys, candidates, ScannerConfig::default())
    }

    /// Creates a scanner with a custom configuration.
    pub fn with_config(
        keys: ViewOnlyKeyPair,
        candidates: Vec<MoneroAddress>,
        config: ScannerConfig,
    ) -> Self {
        let spend_keys = candidates.iter().map(|a| *a.public_spend_key()).collect();
        Self {
            keys,
            candidates,
            spend_keys,
            config,
            stats: RwLock::new(ScanStats::new()),
        }
    }

    /// Creates a scanner over the primary address and subaddresses
    /// `(major, minor)` for `major < accounts`, `minor < per_account`.
    pub fn with_lookahead(
        keys: ViewOnlyKeyPair,
        network: NetworkType,
        accounts: u32,
        per_account: u32,
        config: ScannerConfig,
    ) -> Self {
        let mut candidates = vec![keys.primary_address(network)];
        for major in 0..accounts {
            for minor in 0..per_account {
                if major != 0 || minor != 0 {
                    candidates.push(keys.subaddress(network, major, minor));
                }
            }
        }
        Self::with_config(keys, candidates, config)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Returns the candidate addresses.
    pub fn candidates(&self) -> &[MoneroAddress] {
        &self.candidates
    }

    /// Returns the current statistics.
    pub fn stats(&self) -> ScanStats {
        self.stats.read().clone()
    }

    /// Resets the statistics.
    pub fn reset_stats(&self) {
        *self.stats.write() = ScanStats::new();
    }

    /// Scans one transaction.
    ///
    /// # Errors
    /// Fails when the extra field holds no valid transaction public key, or,
    /// with `fail_fast`, on the first malformed output.
    pub fn scan_transaction(&self, tx: &LedgerTransaction) -> Result<TransactionScan> {
        let result = self.scan_outputs(tx);
        let mut stats = self.stats.write();
        match &result {
            Ok(scan) => stats.record_transaction(scan),
            Err(_) => stats.record_failed_transaction(),
        }
        result
    }

    fn scan_outputs(&self, tx: &LedgerTransaction) -> Result<TransactionScan> {
        let tx_pub = get_tx_public_key(&tx.extra)?;
        let secret = shared_secret(self.keys.private_view_key(), &tx_pub);

        let mut outcomes = Vec::with_capacity(tx.outputs.len());
        for (position, output) in tx.outputs.iter().enumerate() {
            let index = position as u64;
            let scan = scan_output_with_secret(
                output,
                index,
                &secret,
                &self.spend_keys,
                self.config.use_view_tags,
            );
            let outcome = match scan {
                Ok(OutputScan::Owned {
                    candidate,
                    output_key,
                    amount,
                }) => {
                    let owned = OwnedOutput {
                        tx_hash: tx.hash.clone(),
                        block_height: tx.block_height,
                        index,
                        output_key,
                        address: self.candidates[candidate].clone(),
                        amount,
                    };
                    if amount < self.config.min_amount {
                        OutputOutcome::BelowMinimum(owned)
                    } else {
                        OutputOutcome::Owned(owned)
                    }
                }
                Ok(OutputScan::NotOwned) => OutputOutcome::NotOwned,
                Ok(OutputScan::FilteredByViewTag) => OutputOutcome::FilteredByViewTag,
                Ok(OutputScan::MissingKey) => OutputOutcome::MissingKey,
                Err(e) if self.config.fail_fast => return Err(e),
                Err(e) => {
                    warn!(tx = %tx.hash, index, error = %e, "Output scan failed");
                    OutputOutcome::Failed(e)
                }
            };
            outcomes.push(outcome);
        }

        let relevant = outcomes.iter().any(|o| o.owned_output().is_some());
        let payment_id = if relevant {
            get_payment_id(&tx.extra)
                .ok()
                .map(|id| encrypt_payment_id(&id, &secret))
        } else {
            None
        };

        debug!(
            tx = %tx.hash,
            outputs = outcomes.len(),
            relevant,
            "Scanned transaction"
        );

        Ok(TransactionScan {
            hash: tx.hash.clone(),
            block_height: tx.block_height,
            tx_public_key: Some(tx_pub),
            payment_id,
            outcomes,
            error: None,
        })
    }

    /// Scans a list of transactions, results in input order.
    ///
    /// Without `fail_fast`, a transaction that cannot be scanned yields a
    /// [`TransactionScan`] carrying its error.
    #[instrument(skip(self, txs), fields(count = txs.len()))]
    pub fn scan_transactions(&self, txs: &[LedgerTransaction]) -> Result<Vec<TransactionScan>> {
        let start = Instant::now();

        let results: Vec<Result<TransactionScan>> = if self.config.parallel {
            txs.par_iter().map(|tx| self.scan_transaction(tx)).collect()
        } else {
            let mut results = Vec::with_capacity(txs.len());
            for tx in txs {
                let result = self.scan_transaction(tx);
                let stop = self.config.fail_fast && result.is_err();
                results.push(result);
                if stop {
                    break;
                }
            }
            results
        };

        let mut scans = Vec::with_capacity(results.len());
        for (tx, result) in txs.iter().zip(results) {
            match result {
                Ok(scan) => scans.push(scan),
                Err(e) if self.config.fail_fast => return Err(e),
                Err(e) => {
                    warn!(tx = %tx.hash, error = %e, "Transaction scan failed");
                    scans.push(TransactionScan::failed(tx, e));
                }
            }
        }

        let mut stats = self.stats.write();
        stats.duration_ms += start.elapsed().as_millis() as u64;

        info!(
            transactions = scans.len(),
            owned = stats.owned,
            filter_efficiency = format!("{:.1}%", stats.filter_efficiency()),
            "Scan complete"
        );

        Ok(scans)
    }

    /// Scans every transaction `source` holds in `heights`.
    #[instrument(skip(self, source))]
    pub async fn scan_source(
        &self,
        source: &dyn TransactionSource,
        heights: Range<u64>,
    ) -> Result<Vec<TransactionScan>> {
        self.scan_source_inner(source, heights, None).await
    }

    /// Scans `heights` reporting progress after every fetched batch.
    #[instrument(skip(self, source, progress_callback))]
    pub async fn scan_source_with_progress(
        &self,
        source: &dyn TransactionSource,
        heights: Range<u64>,
        progress_callback: ProgressCallback,
    ) -> Result<Vec<TransactionScan>> {
        self.scan_source_inner(source, heights, Some(progress_callback))
            .await
    }

    async fn scan_source_inner(
        &self,
        source: &dyn TransactionSource,
        heights: Range<u64>,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<Vec<TransactionScan>> {
        let chain_height = source.chain_height().await?;
        let end = heights.end.min(chain_height);
        let total = end.saturating_sub(heights.start);

        info!(from = heights.start, to = end, "Starting scan");

        let mut progress = ScanProgress {
            total,
            ..Default::default()
        };
        let mut scans = Vec::new();
        let mut from = heights.start;

        while from < end {
            let to = from.saturating_add(self.config.batch_size).min(end);
            let txs = source.transactions_in_range(from..to).await?;
            debug!(from, to, count = txs.len(), "Scanning batch");

            let batch = self.scan_transactions(&txs)?;
            for scan in &batch {
                for outcome in &scan.outcomes {
                    match outcome {
                        OutputOutcome::Owned(_) | OutputOutcome::BelowMinimum(_) => {
                            progress.view_tag_matches += 1;
                            progress.owned += 1;
                        }
                        OutputOutcome::NotOwned => progress.view_tag_matches += 1,
                        _ => {}
                    }
                }
            }
            scans.extend(batch);

            progress.scanned = to - heights.start;
            if let Some(callback) = &progress_callback {
                callback(progress.clone());
            }
            from = to;
        }

        Ok(scans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xmrkit_core::types::LedgerOutput;
    use xmrkit_stealth::{build_extra, FullKeyPair, StealthPaymentBuilder};

    const TX_PUB: &str = "7302dd77bf4095baf868de43b7a32f4a36fe9d8b48ccfff537157a4a786fa364";
    const VIEW_KEY: &str = "8aa763d1c8d9da4ca75cb6ca22a021b5cca376c1367be8d62bcc9cdf4b926009";
    const SPEND_PUB: &str = "38e9908d33d034de0ba1281aa7afe3907b795cea14852b3d8fe276e8931cb130";
    const OUT_KEY: &str = "7e4f4427539b206740bed78b81b0dc10acb89aa1545880863f73264492ee0c16";

    fn stagenet_scanner(config: ScannerConfig) -> Scanner {
        let keys = ViewOnlyKeyPair::from_hex(VIEW_KEY, SPEND_PUB).unwrap();
        Scanner::with_lookahead(keys, NetworkType::Stagenet, 2, 4, config)
    }

    fn foreign_output_key() -> String {
        xmrkit_crypto::PrivateKey::generate().public_key().to_hex()
    }

    fn stagenet_tx() -> LedgerTransaction {
        let tx_pub = PublicKey::from_hex(TX_PUB).unwrap();
        LedgerTransaction::new(
            "stagenet",
            build_extra(&tx_pub, None),
            vec![
                LedgerOutput::new(foreign_output_key(), "0000000000000000").with_view_tag("00"),
                LedgerOutput::new(OUT_KEY, "5db33f80fd4990bc").with_view_tag("1a"),
            ],
        )
        .at_height(1_619_500)
    }

    fn payment_tx(address: MoneroAddress, amount: u64, height: u64) -> LedgerTransaction {
        StealthPaymentBuilder::new()
            .recipient(address, amount)
            .build()
            .unwrap()
            .to_transaction(format!("tx{}", height))
            .at_height(height)
    }

    #[test]
    fn test_scan_known_output() {
        let scanner = stagenet_scanner(ScannerConfig::new());
        let scan = scanner.scan_transaction(&stagenet_tx()).unwrap();

        assert_eq!(scan.outcomes.len(), 2);
        let owned: Vec<&OwnedOutput> = scan.owned().collect();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].index, 1);
        assert_eq!(owned[0].amount, 550_000_000_000);
        assert_eq!(owned[0].output_key.to_hex(), OUT_KEY);
        assert_eq!(owned[0].address, scanner.candidates()[0]);
        assert_eq!(scan.total_received(), 550_000_000_000);
        assert!(scan.payment_id.is_none());
    }

    #[test]
    fn test_stats_after_scan() {
        let scanner = stagenet_scanner(ScannerConfig::new());
        scanner.scan_transaction(&stagenet_tx()).unwrap();

        let stats = scanner.stats();
        assert_eq!(stats.transactions_scanned, 1);
        assert_eq!(stats.outputs_scanned, 2);
        assert_eq!(stats.owned, 1);
        assert_eq!(stats.total_received, 550_000_000_000);
        // the random foreign output may slip past the tag filter
        assert_eq!(stats.view_tag_rejects + stats.ownership_checks, 2);

        scanner.reset_stats();
        assert_eq!(scanner.stats(), ScanStats::default());
    }

    #[test]
    fn test_min_amount() {
        let scanner = stagenet_scanner(ScannerConfig::new().min_amount(600_000_000_000));
        let scan = scanner.scan_transaction(&stagenet_tx()).unwrap();

        assert_eq!(scan.owned().count(), 0);
        assert!(scan.is_relevant());
        assert!(matches!(scan.outcomes[1], OutputOutcome::BelowMinimum(_)));
        assert_eq!(scanner.stats().below_minimum, 1);
    }

    #[test]
    fn test_subaddress_discovery() {
        let wallet = FullKeyPair::generate();
        let sub = wallet.subaddress(NetworkType::Mainnet, 1, 3);
        let tx = payment_tx(sub.clone(), 42, 1);

        let scanner = Scanner::with_lookahead(
            wallet.view_only(),
            NetworkType::Mainnet,
            2,
            5,
            ScannerConfig::new(),
        );
        let scan = scanner.scan_transaction(&tx).unwrap();
        let owned: Vec<&OwnedOutput> = scan.owned().collect();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].address, sub);
        assert_eq!(owned[0].amount, 42);
    }

    #[test]
    fn test_payment_id_decrypted() {
        let wallet = FullKeyPair::generate();
        let primary = wallet.primary_address(NetworkType::Mainnet);
        let id = [9, 8, 7, 6, 5, 4, 3, 2];
        let tx = StealthPaymentBuilder::new()
            .recipient(primary.integrated(id).unwrap(), 5)
            .build()
            .unwrap()
            .to_transaction("pid");

        let scanner = Scanner::new(wallet.view_only(), vec![primary]);
        let scan = scanner.scan_transaction(&tx).unwrap();
        assert_eq!(scan.payment_id, Some(id));
        assert_eq!(scan.total_received(), 5);
    }

    #[test]
    fn test_malformed_output_isolated() {
        let mut tx = stagenet_tx();
        tx.outputs[0] = LedgerOutput::new("not hex", "00");

        let scanner = stagenet_scanner(ScannerConfig::new());
        let scan = scanner.scan_transaction(&tx).unwrap();
        assert_eq!(scan.failure_count(), 1);
        assert!(scan.outcomes[0].is_failure());
        assert_eq!(scan.total_received(), 550_000_000_000);
        assert_eq!(scanner.stats().failures, 1);
    }

    #[test]
    fn test_fail_fast() {
        let mut tx = stagenet_tx();
        tx.outputs[0] = LedgerOutput::new(OUT_KEY, "00").with_view_tag("zz");

        let scanner = stagenet_scanner(ScannerConfig::new().fail_fast());
        assert!(matches!(
            scanner.scan_transaction(&tx),
            Err(XmrError::InvalidHexEncoding(_))
        ));
        assert_eq!(scanner.stats().failed_transactions, 1);
    }

    #[test]
    fn test_bad_extra_isolated_in_batch() {
        let mut broken = stagenet_tx();
        broken.hash = "broken".into();
        broken.extra.clear();
        let txs = vec![broken, stagenet_tx()];

        let scanner = stagenet_scanner(ScannerConfig::new());
        let scans = scanner.scan_transactions(&txs).unwrap();
        assert_eq!(scans.len(), 2);
        assert!(matches!(
            scans[0].error,
            Some(XmrError::InvalidExtraLength { .. })
        ));
        assert_eq!(scans[1].total_received(), 550_000_000_000);

        let strict = stagenet_scanner(ScannerConfig::new().fail_fast());
        assert!(strict.scan_transactions(&txs).is_err());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let wallet = FullKeyPair::generate();
        let primary = wallet.primary_address(NetworkType::Testnet);
        let stranger = FullKeyPair::generate().primary_address(NetworkType::Testnet);

        let txs: Vec<LedgerTransaction> = (0..16)
            .map(|i| {
                let to = if i % 3 == 0 { primary.clone() } else { stranger.clone() };
                payment_tx(to, 1_000 + i, i)
            })
            .collect();

        let sequential = Scanner::new(wallet.view_only(), vec![primary.clone()]);
        let parallel = Scanner::with_config(
            wallet.view_only(),
            vec![primary],
            ScannerConfig::new().parallel(),
        );

        let a = sequential.scan_transactions(&txs).unwrap();
        let b = parallel.scan_transactions(&txs).unwrap();
        let totals_a: Vec<u64> = a.iter().map(TransactionScan::total_received).collect();
        let totals_b: Vec<u64> = b.iter().map(TransactionScan::total_received).collect();
        assert_eq!(totals_a, totals_b);
        assert_eq!(totals_a.iter().filter(|&&t| t > 0).count(), 6);
    }

    #[test]
    fn test_without_view_tags_same_result() {
        let scanner = stagenet_scanner(ScannerConfig::new().without_view_tags());
        let scan = scanner.scan_transaction(&stagenet_tx()).unwrap();
        assert_eq!(scan.total_received(), 550_000_000_000);
        assert_eq!(scanner.stats().view_tag_rejects, 0);
        assert_eq!(scanner.stats().ownership_checks, 2);
    }

    #[tokio::test]
    async fn test_scan_source() {
        let wallet = FullKeyPair::generate();
        let primary = wallet.primary_address(NetworkType::Mainnet);
        let stranger = FullKeyPair::generate().primary_address(NetworkType::Mainnet);

        let source = MemorySource::from_transactions(vec![
            payment_tx(primary.clone(), 10, 100),
            payment_tx(stranger, 20, 150),
            payment_tx(primary.clone(), 30, 250),
        ]);

        let scanner = Scanner::with_config(
            wallet.view_only(),
            vec![primary],
            ScannerConfig::new().batch_size(50),
        );
        let scans = scanner.scan_source(&source, 0..200).await.unwrap();
        assert_eq!(scans.len(), 2);
        let total: u64 = scans.iter().map(TransactionScan::total_received).sum();
        assert_eq!(total, 10);

        // the range is clipped at the chain height
        let scans = scanner.scan_source(&source, 200..10_000).await.unwrap();
        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].total_received(), 30);
    }

    #[tokio::test]
    async fn test_scan_source_progress() {
        let wallet = FullKeyPair::generate();
        let primary = wallet.primary_address(NetworkType::Mainnet);
        let source = MemorySource::from_transactions(
            (0..10)
                .map(|h| payment_tx(primary.clone(), 1, h * 10))
                .collect(),
        );

        let updates = Arc::new(RwLock::new(Vec::new()));
        let updates_clone = updates.clone();
        let callback: ProgressCallback = Box::new(move |progress| {
            updates_clone.write().push(progress);
        });

        let scanner = Scanner::with_config(
            wallet.view_only(),
            vec![primary],
            ScannerConfig::new().batch_size(25),
        );
        let chain_height = source.chain_height().await.unwrap();
        let scans = scanner
            .scan_source_with_progress(&source, 0..chain_height, callback)
            .await
            .unwrap();
        assert_eq!(scans.len(), 10);

        let updates = updates.read();
        assert_eq!(updates.len(), 4);
        let last = updates.last().unwrap();
        assert_eq!(last.owned, 10);
        assert!((last.fraction() - 1.0).abs() < f64::EPSILON);
    }
}
