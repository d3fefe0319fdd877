//! Periodic driver for batch syncs.
//!
//! Each tick runs one batch on the blocking pool. The shutdown flag is
//! checked by the batch between feeds, so a signal abandons the run at a
//! feed boundary while any in-flight network call completes on its own.

use crate::config::Config;
use crate::sync::feed_sync_job::FeedSyncer;
use crate::sync::sync_job::SyncJob;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub async fn start(syncer: FeedSyncer, shutdown: Arc<AtomicBool>) {
    let mut interval =
        tokio::time::interval(Duration::from_secs(Config::sync_interval_in_seconds()));

    loop {
        interval.tick().await;

        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        let batch_syncer = syncer.clone();
        let batch_shutdown = shutdown.clone();

        let result = tokio::task::spawn_blocking(move || {
            SyncJob::new().execute(&batch_syncer, &batch_shutdown)
        })
        .await;

        if let Err(error) = result {
            log::error!("A sync batch panicked: {error:?}");
        }
    }
}
