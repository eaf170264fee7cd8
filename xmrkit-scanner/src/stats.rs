//! Scan statistics.

use serde::{Deserialize, Serialize};

use crate::{OutputOutcome, TransactionScan};

/// Counters accumulated over a scanner's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Transactions scanned, failed ones included
    pub transactions_scanned: u64,
    /// Transactions whose extra field held no usable public key
    pub failed_transactions: u64,
    /// Outputs scanned
    pub outputs_scanned: u64,
    /// Outputs rejected by the view tag filter
    pub view_tag_rejects: u64,
    /// Outputs that went through the exact ownership check
    pub ownership_checks: u64,
    /// Owned outputs at or above the minimum amount
    pub owned: u64,
    /// Owned outputs below the minimum amount
    pub below_minimum: u64,
    /// Outputs that failed to parse or decrypt
    pub failures: u64,
    /// Sum of owned amounts in atomic units
    pub total_received: u64,
    /// Time spent in batch scans, in milliseconds
    pub duration_ms: u64,
}

impl ScanStats {
    /// Creates a new stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one output outcome.
    pub fn record(&mut self, outcome: &OutputOutcome) {
        self.outputs_scanned += 1;
        match outcome {
            OutputOutcome::Owned(output) => {
                self.ownership_checks += 1;
                self.owned += 1;
                self.total_received = self.total_received.saturating_add(output.amount);
            }
            OutputOutcome::BelowMinimum(_) => {
                self.ownership_checks += 1;
                self.below_minimum += 1;
            }
            OutputOutcome::NotOwned => self.ownership_checks += 1,
            OutputOutcome::FilteredByViewTag => self.view_tag_rejects += 1,
            OutputOutcome::MissingKey => {}
            OutputOutcome::Failed(_) => self.failures += 1,
        }
    }

    /// Records every output of a scanned transaction.
    pub fn record_transaction(&mut self, scan: &TransactionScan) {
        self.transactions_scanned += 1;
        for outcome in &scan.outcomes {
            self.record(outcome);
        }
    }

    /// Records a transaction that could not be scanned at all.
    pub fn record_failed_transaction(&mut self) {
        self.transactions_scanned += 1;
        self.failed_transactions += 1;
    }

    /// Returns the scan rate (outputs per second).
    pub fn rate(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.outputs_scanned as f64 / self.duration_ms as f64) * 1000.0
        }
    }

    /// Returns the filter efficiency (percentage of outputs rejected by view tag).
    pub fn filter_efficiency(&self) -> f64 {
        if self.outputs_scanned == 0 {
            0.0
        } else {
            (self.view_tag_rejects as f64 / self.outputs_scanned as f64) * 100.0
        }
    }
}
