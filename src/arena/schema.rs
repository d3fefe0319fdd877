//! Typed view over the Are.na feed schema.
//!
//! The remote schema is duck-typed: the shape of `item` and `target` depends
//! on the activity's `action`, and almost every field can be missing or null.
//! Everything here is optional except numeric ids; callers decide how to
//! degrade when a field is absent.

use crate::config::Config;
use chrono::offset::Utc;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CHANNEL_STATUS_PUBLIC: &str = "public";
pub const CHANNEL_STATUS_PRIVATE: &str = "private";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Channel,
    User,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::Channel => write!(f, "channel"),
            FeedKind::User => write!(f, "user"),
        }
    }
}

/// One entry of a channel or user feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub item: Option<Item>,
    #[serde(default)]
    pub target: Option<Item>,
}

impl Story {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;

        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|value| value.with_timezone(&Utc))
    }
}

/// The subject of a story, discriminated by `base_class`.
///
/// Comments come back with a `Comment` base class but carry the block shape
/// plus a `body`, so they are folded into `Block`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "base_class")]
pub enum Item {
    #[serde(alias = "Comment")]
    Block(Block),
    Channel(Channel),
    User(User),
}

impl Item {
    pub fn title(&self) -> Option<String> {
        match self {
            Item::Block(block) => block.title.clone(),
            Item::Channel(channel) => channel.title.clone(),
            Item::User(user) => user.display_name(),
        }
    }

    pub fn url(&self) -> Option<String> {
        match self {
            Item::Block(block) => Some(block.permalink()),
            Item::Channel(channel) => Some(channel.url()),
            Item::User(user) => user.url(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Item::Block(block) => block.user.as_ref(),
            Item::Channel(channel) => channel.user.as_ref(),
            Item::User(user) => Some(user),
        }
    }

    pub fn image_url(&self) -> Option<String> {
        match self {
            Item::Block(block) => block.image_url(),
            Item::Channel(_) => None,
            Item::User(user) => user.thumb_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image: Option<ImageSet>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub user: Option<User>,
}

impl Block {
    pub fn permalink(&self) -> String {
        join_url(&[Some("block"), Some(&self.id.to_string())])
    }

    pub fn image_url(&self) -> Option<String> {
        self.image
            .as_ref()
            .and_then(|image| image.original.as_ref())
            .map(|original| original.url.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub length: Option<i64>,
    #[serde(default)]
    pub follower_count: Option<i64>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl Channel {
    /// `{base}/{owner-slug}/{slug}`, omitting missing segments.
    pub fn url(&self) -> String {
        let owner_slug = self.user.as_ref().and_then(|user| user.slug.as_deref());

        join_url(&[owner_slug, self.slug.as_deref()])
    }

    pub fn thumb_url(&self) -> Option<String> {
        self.user.as_ref().and_then(|user| user.thumb_url())
    }

    pub fn description(&self) -> Option<String> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.description.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub channel_count: Option<i64>,
    #[serde(default)]
    pub follower_count: Option<i64>,
    #[serde(default)]
    pub avatar_image: Option<AvatarImage>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl User {
    pub fn display_name(&self) -> Option<String> {
        self.full_name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| self.first_and_last_name())
            .or_else(|| self.username.clone())
    }

    fn first_and_last_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// `{base}/{slug}`, none when the user has no slug.
    pub fn url(&self) -> Option<String> {
        self.slug
            .as_deref()
            .map(|slug| join_url(&[Some(slug)]))
    }

    pub fn thumb_url(&self) -> Option<String> {
        self.avatar_image
            .as_ref()
            .and_then(|avatar| avatar.display.clone())
    }

    pub fn description(&self) -> Option<String> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.description.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSet {
    #[serde(default)]
    pub original: Option<ImageUrl>,
    #[serde(default)]
    pub display: Option<ImageUrl>,
    #[serde(default)]
    pub thumb: Option<ImageUrl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarImage {
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub description: Option<String>,
}

/// A subscribable Are.na entity, fetched as feed metadata and cached on the
/// subscription between syncs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "base_class")]
pub enum Entity {
    Channel(Channel),
    User(User),
}

impl Entity {
    pub fn id(&self) -> i64 {
        match self {
            Entity::Channel(channel) => channel.id,
            Entity::User(user) => user.id,
        }
    }

    pub fn slug(&self) -> Option<String> {
        match self {
            Entity::Channel(channel) => channel.slug.clone(),
            Entity::User(user) => user.slug.clone(),
        }
    }

    pub fn title(&self) -> Option<String> {
        match self {
            Entity::Channel(channel) => channel.title.clone(),
            Entity::User(user) => user.display_name(),
        }
    }

    pub fn url(&self) -> String {
        match self {
            Entity::Channel(channel) => channel.url(),
            Entity::User(user) => user.url().unwrap_or_else(|| Config::arena_url()),
        }
    }

    pub fn thumb_url(&self) -> Option<String> {
        match self {
            Entity::Channel(channel) => channel.thumb_url(),
            Entity::User(user) => user.thumb_url(),
        }
    }

    pub fn description(&self) -> Option<String> {
        match self {
            Entity::Channel(channel) => channel.description(),
            Entity::User(user) => user.description(),
        }
    }
}

/// Joins the configured base URL with the present segments, skipping absent
/// ones instead of inserting empty path components.
pub fn join_url(segments: &[Option<&str>]) -> String {
    let mut parts = vec![Config::arena_url()];

    for segment in segments.iter().flatten() {
        parts.push((*segment).to_string());
    }

    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_parses_a_story_with_a_block_item() {
        let story: Story = serde_json::from_value(json!({
            "action": "added",
            "created_at": "2024-05-01T10:00:00Z",
            "user": { "id": 1, "slug": "pete", "full_name": "Pete" },
            "item": {
                "base_class": "Block",
                "id": 99,
                "title": null,
                "source": { "url": "http://example.com/x" }
            },
            "target": {
                "base_class": "Channel",
                "id": 5,
                "title": "Delightfully absurd",
                "slug": "delightfully-absurd",
                "user": { "id": 2, "slug": "tess-french" }
            }
        }))
        .unwrap();

        assert_eq!(story.action.as_deref(), Some("added"));
        assert!(story.timestamp().is_some());

        match story.item {
            Some(Item::Block(ref block)) => {
                assert_eq!(block.id, 99);
                assert_eq!(block.permalink(), "https://www.are.na/block/99");
                assert!(block.image_url().is_none());
            }
            ref other => panic!("expected block item, got {:?}", other),
        }

        match story.target {
            Some(Item::Channel(ref channel)) => {
                assert_eq!(
                    channel.url(),
                    "https://www.are.na/tess-french/delightfully-absurd"
                );
            }
            ref other => panic!("expected channel target, got {:?}", other),
        }
    }

    #[test]
    fn it_folds_comments_into_blocks() {
        let item: Item = serde_json::from_value(json!({
            "base_class": "Comment",
            "id": 7,
            "body": "nice one"
        }))
        .unwrap();

        match item {
            Item::Block(block) => assert_eq!(block.body.as_deref(), Some("nice one")),
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn it_returns_none_for_an_unparseable_timestamp() {
        let story: Story = serde_json::from_value(json!({
            "action": "added",
            "created_at": "yesterday"
        }))
        .unwrap();

        assert!(story.timestamp().is_none());
    }

    #[test]
    fn channel_url_omits_missing_owner_slug() {
        let channel: Channel = serde_json::from_value(json!({
            "id": 5,
            "slug": "cool-things"
        }))
        .unwrap();

        assert_eq!(channel.url(), "https://www.are.na/cool-things");
    }

    #[test]
    fn user_display_name_falls_back_to_name_parts() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "first_name": "Mikki",
            "last_name": "Janower",
            "username": "mikki"
        }))
        .unwrap();

        assert_eq!(user.display_name().unwrap(), "Mikki Janower");
    }
}
