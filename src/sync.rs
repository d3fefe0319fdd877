pub mod activity;
pub mod backlog;
pub mod feed_sync_job;
pub mod observer;
pub mod scheduler;
pub mod sync_job;

pub use activity::{classify, ClassifiedActivity};
pub use backlog::{collect_backlog, Backlog, WalkError};
pub use feed_sync_job::{FeedSyncError, FeedSyncer, SkipReason, SyncOutcome};
pub use observer::{LogObserver, SyncObserver};
pub use sync_job::{BatchStats, SyncJob};
