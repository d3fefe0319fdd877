//! Syncs one feed subscription end to end: refresh the cached metadata, walk
//! the backlog, post each rendered activity, then advance the cursor.
//!
//! The cursor write is the last step and the only mutation; a crash between a
//! post and that write replays the same window next run. Delivery is
//! at-least-once by design.

use crate::arena::client::{ArenaClient, ClientError};
use crate::config::Config;
use crate::deliver::poster::Poster;
use crate::deliver::render_message;
use crate::models::FeedSubscription;
use crate::store::{StoreError, SubscriptionStore};
use crate::sync::activity::{classify, ClassifiedActivity};
use crate::sync::backlog::{collect_backlog, WalkError};
use crate::sync::observer::SyncObserver;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSyncError {
    Timeout,
    Client { msg: String },
    Post { msg: String },
    Store { msg: String },
}

impl From<StoreError> for FeedSyncError {
    fn from(error: StoreError) -> Self {
        FeedSyncError::Store {
            msg: format!("{error:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    RemoteGone,
    Unauthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced { posted: usize },
    Skipped { reason: SkipReason },
}

/// Collaborators for one sync run. Cheap to clone; the scheduler hands a
/// clone to each batch.
#[derive(Clone)]
pub struct FeedSyncer {
    pub client: Arc<dyn ArenaClient>,
    pub poster: Arc<dyn Poster>,
    pub store: Arc<dyn SubscriptionStore>,
    pub observer: Arc<dyn SyncObserver>,
}

impl FeedSyncer {
    pub fn new(
        client: Arc<dyn ArenaClient>,
        poster: Arc<dyn Poster>,
        store: Arc<dyn SubscriptionStore>,
        observer: Arc<dyn SyncObserver>,
    ) -> Self {
        Self {
            client,
            poster,
            store,
            observer,
        }
    }

    pub fn sync_feed(
        &self,
        subscription: &FeedSubscription,
    ) -> Result<SyncOutcome, FeedSyncError> {
        let feed = subscription.to_string();
        let mut subscription = subscription.clone();

        self.refresh_parent(&mut subscription, &feed);

        let deadline = Instant::now() + Duration::from_secs(Config::sync_timeout_in_seconds());

        let backlog = match collect_backlog(
            |page| {
                self.client
                    .fetch_page(subscription.kind, subscription.remote_id, page)
            },
            subscription.last_synced_at,
            deadline,
            &feed,
            self.observer.as_ref(),
        ) {
            Ok(backlog) => backlog,
            Err(WalkError::NotFound) => {
                self.observer.feed_skipped(&feed, "remote entity not found");

                return Ok(SyncOutcome::Skipped {
                    reason: SkipReason::RemoteGone,
                });
            }
            Err(WalkError::Unauthorized) => {
                self.observer.feed_skipped(&feed, "remote entity unauthorized");

                return Ok(SyncOutcome::Skipped {
                    reason: SkipReason::Unauthorized,
                });
            }
            Err(WalkError::Timeout) => return Err(FeedSyncError::Timeout),
            Err(WalkError::Client { msg }) => return Err(FeedSyncError::Client { msg }),
        };

        let mut posted = 0;

        for story in backlog.stories {
            match classify(story) {
                ClassifiedActivity::Unsupported { action } => {
                    self.observer
                        .activity_dropped(&feed, &format!("unsupported action \"{action}\""));
                }
                activity => {
                    if let Some(message) = render_message::render(&activity) {
                        self.poster
                            .post(&subscription.channel_id, &message)
                            .map_err(|error| FeedSyncError::Post { msg: error.msg })?;

                        posted += 1;
                    }
                }
            }
        }

        // A no-op sync still refreshes the cursor.
        subscription.last_synced_at = Some(backlog.cursor);
        self.store.update(&subscription)?;

        self.observer.feed_synced(&feed, posted);

        Ok(SyncOutcome::Synced { posted })
    }

    /// Refreshes the cached metadata snapshot; any failure keeps the
    /// last-known snapshot and is non-fatal for the rest of the sync.
    fn refresh_parent(&self, subscription: &mut FeedSubscription, feed: &str) {
        match self
            .client
            .fetch_entity(subscription.kind, &subscription.remote_id.to_string())
        {
            Ok(entity) => {
                subscription.remote_slug = entity.slug();
                subscription.cached_parent = Some(entity);
            }
            Err(ClientError::NotFound) => {
                self.observer.parent_refresh_failed(feed, "not found");
            }
            Err(ClientError::Unauthorized) => {
                self.observer.parent_refresh_failed(feed, "unauthorized");
            }
            Err(error) => {
                self.observer
                    .parent_refresh_failed(feed, &format!("{error:?}"));
            }
        }
    }
}
