//! Persistence contract for feed subscriptions.
//!
//! The sync engine treats this as a keyed store and does not care about the
//! backing technology. `memory::MemoryStore` is the reference implementation;
//! embedders bring their own.

pub mod memory;

use crate::arena::schema::FeedKind;
use crate::models::FeedSubscription;

pub use memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The (kind, team, remote id, channel) uniqueness invariant was violated.
    AlreadyExists,
    NotFound,
    Backend { msg: String },
}

/// Lookup key for the remote side of a subscription. The slug is mutable on
/// Are.na, so it is only a fallback when the id is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLookup {
    Id(i64),
    Slug(String),
}

pub trait SubscriptionStore: Send + Sync {
    fn create(&self, subscription: FeedSubscription) -> Result<FeedSubscription, StoreError>;

    fn find(
        &self,
        kind: FeedKind,
        team_id: &str,
        lookup: &FeedLookup,
        channel_id: &str,
    ) -> Option<FeedSubscription>;

    fn list_for_team(
        &self,
        team_id: &str,
        channel_id: Option<&str>,
        kind: Option<FeedKind>,
    ) -> Vec<FeedSubscription>;

    /// Teams with at least one subscription, for batch scheduling.
    fn team_ids(&self) -> Vec<String>;

    fn update(&self, subscription: &FeedSubscription) -> Result<(), StoreError>;

    fn delete(&self, subscription: &FeedSubscription) -> Result<(), StoreError>;
}
