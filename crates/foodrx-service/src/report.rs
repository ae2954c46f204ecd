//! Run reports returned by the engines.

use serde::{Deserialize, Serialize};

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// New notification records.
    pub notifications_created: u64,
    /// Existing same-day digests whose content was replaced.
    pub notifications_updated: u64,
    /// Users examined.
    pub users_scanned: u64,
    /// Users skipped because of an error.
    pub users_failed: u64,
}

/// Outcome of a delivery run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Pending notifications when the run started.
    pub total_pending: u64,
    /// Notifications examined.
    pub processed: u64,
    /// Accepted by the provider and marked sent.
    pub sent: u64,
    /// Rejected by the provider or not committed.
    pub failed: u64,
    /// Recipient missing or without a device token.
    pub skipped_no_token: u64,
    /// Non-empty batches fetched.
    pub batches: u32,
}

/// Outcome of a period reset run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetReport {
    /// Users examined.
    pub users_processed: u64,
    /// Progress snapshots written.
    pub snapshots_written: u64,
    /// Goal counters zeroed.
    pub goals_reset: u64,
    /// Users whose snapshots could not be written.
    pub snapshot_failures: u64,
    /// Users whose goals could not be read or reset.
    pub reset_failures: u64,
}
