//! Subscription lifecycle: connect an Are.na channel or user to a Slack
//! channel, and disconnect it again.
//!
//! Connect resolves the entity by id or slug, rejects duplicates and
//! announces the new feed in the destination channel. Disconnect falls back
//! to the stored slug so a feed whose remote entity was deleted can still be
//! removed.

use crate::arena::client::{ArenaClient, ClientError};
use crate::arena::schema::FeedKind;
use crate::deliver::poster::Poster;
use crate::deliver::render_message;
use crate::models::FeedSubscription;
use crate::store::{FeedLookup, StoreError, SubscriptionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The feed is already posting to this channel.
    AlreadyConnected { title: String },
    /// No such entity on Are.na.
    UnknownEntity { arg: String },
    /// No such subscription in this channel.
    UnknownSubscription { arg: String },
    Client { msg: String },
    Store { msg: String },
    Post { msg: String },
}

impl From<StoreError> for CommandError {
    fn from(error: StoreError) -> Self {
        CommandError::Store {
            msg: format!("{error:?}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConnectRequest {
    pub kind: FeedKind,
    pub id_or_slug: String,
    pub team_id: String,
    pub channel_id: String,
    pub channel_name: Option<String>,
    pub created_by: Option<String>,
}

pub fn connect(
    store: &dyn SubscriptionStore,
    client: &dyn ArenaClient,
    poster: &dyn Poster,
    request: ConnectRequest,
) -> Result<FeedSubscription, CommandError> {
    let entity = client
        .fetch_entity(request.kind, &request.id_or_slug)
        .map_err(|error| match error {
            ClientError::NotFound | ClientError::Unauthorized => CommandError::UnknownEntity {
                arg: request.id_or_slug.clone(),
            },
            other => CommandError::Client {
                msg: format!("{other:?}"),
            },
        })?;

    if let Some(existing) = find_subscription(
        store,
        request.kind,
        &request.team_id,
        Some(entity.id()),
        &request.id_or_slug,
        &request.channel_id,
    ) {
        return Err(CommandError::AlreadyConnected {
            title: existing.title().unwrap_or_default(),
        });
    }

    let subscription = FeedSubscription::builder()
        .kind(request.kind)
        .remote_id(entity.id())
        .remote_slug(entity.slug())
        .team_id(request.team_id)
        .channel_id(request.channel_id)
        .channel_name(request.channel_name)
        .created_by(request.created_by)
        .cached_parent(Some(entity.clone()))
        .build();

    let created = store.create(subscription).map_err(|error| match error {
        StoreError::AlreadyExists => CommandError::AlreadyConnected {
            title: entity.title().unwrap_or_default(),
        },
        other => other.into(),
    })?;

    if let Some(message) = render_message::render_subscription(&created) {
        poster
            .post(&created.channel_id, &message)
            .map_err(|error| CommandError::Post { msg: error.msg })?;
    }

    log::info!("SUBSCRIBE: {created}");

    Ok(created)
}

#[derive(Debug, Clone)]
pub struct DisconnectRequest {
    pub kind: FeedKind,
    pub id_or_slug: String,
    pub team_id: String,
    pub channel_id: String,
}

pub fn disconnect(
    store: &dyn SubscriptionStore,
    client: &dyn ArenaClient,
    request: DisconnectRequest,
) -> Result<FeedSubscription, CommandError> {
    let remote_id = client
        .fetch_entity(request.kind, &request.id_or_slug)
        .ok()
        .map(|entity| entity.id());

    let subscription = find_subscription(
        store,
        request.kind,
        &request.team_id,
        remote_id,
        &request.id_or_slug,
        &request.channel_id,
    )
    .ok_or(CommandError::UnknownSubscription {
        arg: request.id_or_slug.clone(),
    })?;

    store.delete(&subscription)?;

    log::info!("UNSUBSCRIBE: {subscription}");

    Ok(subscription)
}

fn find_subscription(
    store: &dyn SubscriptionStore,
    kind: FeedKind,
    team_id: &str,
    remote_id: Option<i64>,
    arg: &str,
    channel_id: &str,
) -> Option<FeedSubscription> {
    if let Some(id) = remote_id {
        if let Some(found) = store.find(kind, team_id, &FeedLookup::Id(id), channel_id) {
            return Some(found);
        }
    }

    store.find(
        kind,
        team_id,
        &FeedLookup::Slug(arg.to_string()),
        channel_id,
    )
}
