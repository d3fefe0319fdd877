//! One batch run across every team's subscriptions.
//!
//! Feeds are processed sequentially within a team; one feed's failure never
//! reaches its siblings. Shutdown is honored at feed boundaries, never
//! mid-feed.

use crate::sync::feed_sync_job::{FeedSyncer, SyncOutcome};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub teams: usize,
    pub feeds: usize,
    pub posted: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Default)]
pub struct SyncJob {}

impl SyncJob {
    pub fn new() -> Self {
        SyncJob {}
    }

    pub fn execute(&self, syncer: &FeedSyncer, shutdown: &AtomicBool) -> BatchStats {
        let mut stats = BatchStats::default();

        'teams: for team_id in syncer.store.team_ids() {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            stats.teams += 1;

            for subscription in syncer.store.list_for_team(&team_id, None, None) {
                if shutdown.load(Ordering::Relaxed) {
                    break 'teams;
                }

                stats.feeds += 1;

                match syncer.sync_feed(&subscription) {
                    Ok(SyncOutcome::Synced { posted }) => stats.posted += posted,
                    Ok(SyncOutcome::Skipped { .. }) => stats.skipped += 1,
                    Err(error) => {
                        stats.failed += 1;
                        syncer
                            .observer
                            .feed_failed(&subscription.to_string(), &format!("{error:?}"));
                    }
                }
            }
        }

        syncer.observer.batch_finished(&stats);

        stats
    }
}
