use crate::arena::schema::{Entity, FeedKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// One team's subscription of an Are.na channel or user to a Slack channel.
///
/// Unique on (kind, team_id, remote_id, channel_id): a remote entity can be
/// subscribed at most once per destination per team, but the same entity may
/// feed several channels, and different teams subscribe independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct FeedSubscription {
    #[builder(default = Uuid::new_v4())]
    pub external_id: Uuid,

    pub kind: FeedKind,
    pub remote_id: i64,
    /// Mutable remote slug, kept as a fallback lookup key.
    #[builder(setter(into), default)]
    pub remote_slug: Option<String>,

    #[builder(setter(into))]
    pub team_id: String,
    #[builder(setter(into))]
    pub channel_id: String,
    /// Display only; the channel can be renamed on the Slack side.
    #[builder(setter(into), default)]
    pub channel_name: Option<String>,
    #[builder(setter(into), default)]
    pub created_by: Option<String>,

    /// Last fetched metadata snapshot, refreshed on every sync.
    #[builder(default)]
    pub cached_parent: Option<Entity>,
    /// The sync cursor; none before the first sync.
    #[builder(default)]
    pub last_synced_at: Option<DateTime<Utc>>,

    #[builder(default = crate::current_time())]
    pub created_at: DateTime<Utc>,
    #[builder(default = crate::current_time())]
    pub updated_at: DateTime<Utc>,
}

impl FeedSubscription {
    pub fn title(&self) -> Option<String> {
        self.cached_parent.as_ref().and_then(|parent| parent.title())
    }

    pub fn channel_mention(&self) -> String {
        format!("<#{}>", self.channel_id)
    }
}

impl fmt::Display for FeedSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kind={}, remote_id={}, title={}, channel_id={}, team_id={}",
            self.kind,
            self.remote_id,
            self.title().unwrap_or_default(),
            self.channel_id,
            self.team_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_builds_with_defaults() {
        let subscription = FeedSubscription::builder()
            .kind(FeedKind::Channel)
            .remote_id(5)
            .team_id("T1")
            .channel_id("C1")
            .build();

        assert!(subscription.last_synced_at.is_none());
        assert!(subscription.cached_parent.is_none());
        assert_eq!(subscription.channel_mention(), "<#C1>");
    }

    #[test]
    fn it_formats_a_readable_description() {
        let subscription = FeedSubscription::builder()
            .kind(FeedKind::User)
            .remote_id(42)
            .team_id("T1")
            .channel_id("C2")
            .build();

        assert_eq!(
            subscription.to_string(),
            "kind=user, remote_id=42, title=, channel_id=C2, team_id=T1"
        );
    }
}
