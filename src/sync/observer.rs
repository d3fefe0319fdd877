//! Logging side-channel for the sync engine.
//!
//! The engine never logs directly; everything operational goes through an
//! injected observer so tests can assert on it and embedders can route it.

use crate::sync::sync_job::BatchStats;

pub trait SyncObserver: Send + Sync {
    fn feed_synced(&self, feed: &str, posted: usize);
    fn feed_skipped(&self, feed: &str, reason: &str);
    fn feed_failed(&self, feed: &str, error: &str);
    fn activity_dropped(&self, feed: &str, reason: &str);
    fn parent_refresh_failed(&self, feed: &str, error: &str);
    fn batch_finished(&self, stats: &BatchStats);
}

/// Default observer backed by the `log` facade.
pub struct LogObserver {}

impl SyncObserver for LogObserver {
    fn feed_synced(&self, feed: &str, posted: usize) {
        log::info!("Synced {feed}, posted {posted} message(s)");
    }

    fn feed_skipped(&self, feed: &str, reason: &str) {
        log::warn!("Skipping {feed}: {reason}");
    }

    fn feed_failed(&self, feed: &str, error: &str) {
        log::error!("Failed to sync {feed}: {error}");
    }

    fn activity_dropped(&self, feed: &str, reason: &str) {
        log::warn!("Dropping an activity in {feed}: {reason}");
    }

    fn parent_refresh_failed(&self, feed: &str, error: &str) {
        log::warn!("Keeping the cached metadata for {feed}: {error}");
    }

    fn batch_finished(&self, stats: &BatchStats) {
        log::info!(
            "Finished a sync batch: {} team(s), {} feed(s), {} posted, {} skipped, {} failed",
            stats.teams,
            stats.feeds,
            stats.posted,
            stats.skipped,
            stats.failed
        );
    }
}
