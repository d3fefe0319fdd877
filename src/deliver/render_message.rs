//! Renders classified activities (and feed metadata) as Slack attachments.
//!
//! Every attachment field is independently optional. Absent values serialize
//! as explicit nulls so that messages of the same kind always share one
//! structural shape; consumers distinguish null-valued keys from missing keys
//! and both must come out the same way every time.

use crate::arena::schema::{
    join_url, Channel, Entity, Item, User, CHANNEL_STATUS_PRIVATE, CHANNEL_STATUS_PUBLIC,
};
use crate::models::FeedSubscription;
use crate::sync::activity::ClassifiedActivity;
use serde::{Deserialize, Serialize};
use serde_json::value::Value as JsonValue;
use typed_builder::TypedBuilder;

const ENTITY_COLOR: &str = "#000000";
const PUBLIC_CHANNEL_COLOR: &str = "#17ac10";
const PRIVATE_CHANNEL_COLOR: &str = "#b60202";
const CLOSED_CHANNEL_COLOR: &str = "#4b3d67";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageField {
    pub title: String,
    pub value: JsonValue,
    pub short: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TypedBuilder)]
pub struct RenderedMessage {
    #[builder(setter(into), default)]
    pub author_name: Option<String>,
    #[builder(setter(into), default)]
    pub author_link: Option<String>,
    #[builder(setter(into), default)]
    pub text: Option<String>,
    #[builder(setter(into), default)]
    pub title: Option<String>,
    #[builder(setter(into), default)]
    pub title_link: Option<String>,
    #[builder(setter(into), default)]
    pub image_url: Option<String>,
    #[builder(setter(into), default)]
    pub color: Option<String>,
    #[builder(default)]
    pub fields: Option<Vec<MessageField>>,
}

/// `None` only for unsupported activities, which callers drop.
pub fn render(activity: &ClassifiedActivity) -> Option<RenderedMessage> {
    match activity {
        ClassifiedActivity::Added { item, target } => Some(render_added(item, target)),
        ClassifiedActivity::Followed { actor, item } => Some(render_followed(actor, item)),
        ClassifiedActivity::Commented {
            actor,
            item,
            target,
        } => Some(render_commented(actor, item, target)),
        ClassifiedActivity::Created { item } => Some(render_created(item)),
        ClassifiedActivity::Collaborating {
            actor,
            item,
            target,
        } => Some(render_collaborating(actor, item, target)),
        ClassifiedActivity::Unsupported { .. } => None,
    }
}

/// A feed's own metadata as an attachment, used when announcing a new
/// subscription and in feed info replies.
pub fn render_entity(entity: &Entity) -> RenderedMessage {
    RenderedMessage::builder()
        .title(entity.title())
        .title_link(Some(entity.url()))
        .text(entity.description())
        .image_url(entity.thumb_url())
        .color(Some(ENTITY_COLOR.to_string()))
        .build()
}

/// The subscription announcement posted on connect.
pub fn render_subscription(subscription: &FeedSubscription) -> Option<RenderedMessage> {
    subscription.cached_parent.as_ref().map(render_entity)
}

fn render_added(item: &Option<Item>, target: &Option<Item>) -> RenderedMessage {
    let author = item.as_ref().and_then(|item| item.user());
    let target_channel = target_channel(target);
    let target_link = channel_link(target_channel);

    let text = match item {
        Some(Item::Channel(_)) => Some(format!("Connected to {target_link}.")),
        Some(_) | None => Some(format!("Added to {target_link}.")),
    };

    // A nested channel links into its owner's namespace, a block to its
    // permalink.
    let title_link = item.as_ref().and_then(|item| item.url());

    RenderedMessage::builder()
        .author_name(author.and_then(|user| user.display_name()))
        .author_link(author.and_then(|user| user.url()))
        .text(text)
        .title(item.as_ref().and_then(|item| item.title()))
        .title_link(title_link)
        .image_url(item.as_ref().and_then(|item| item.image_url()))
        .build()
}

fn render_followed(actor: &Option<User>, item: &Option<Item>) -> RenderedMessage {
    let followed_link = item
        .as_ref()
        .map(|item| slack_link(item.url(), item.title()))
        .unwrap_or_default();

    let text = Some(format!("{} followed {}.", actor_link(actor), followed_link));

    let fields = match item {
        Some(Item::Channel(channel)) => Some(vec![
            count_field("Blocks", channel.length),
            count_field("Followers", channel.follower_count),
        ]),
        Some(Item::User(user)) => Some(vec![
            count_field("Channels", user.channel_count),
            count_field("Followers", user.follower_count),
        ]),
        _ => None,
    };

    let color = match item {
        Some(Item::Channel(channel)) => Some(channel_status_color(channel).to_string()),
        _ => None,
    };

    RenderedMessage::builder()
        .author_name(actor.as_ref().and_then(|user| user.display_name()))
        .author_link(actor.as_ref().and_then(|user| user.url()))
        .text(text)
        .title(item.as_ref().and_then(|item| item.title()))
        .title_link(item.as_ref().and_then(|item| item.url()))
        .fields(fields)
        .color(color)
        .build()
}

fn render_commented(
    actor: &Option<User>,
    item: &Option<Item>,
    target: &Option<Item>,
) -> RenderedMessage {
    let body = match item {
        Some(Item::Block(block)) => block.body.clone().or_else(|| block.content.clone()),
        _ => None,
    };

    RenderedMessage::builder()
        .author_name(actor.as_ref().and_then(|user| user.display_name()))
        .author_link(actor.as_ref().and_then(|user| user.url()))
        .text(body)
        .title(target.as_ref().and_then(|target| target.title()))
        .title_link(target.as_ref().and_then(|target| target.url()))
        .build()
}

fn render_created(item: &Option<Item>) -> RenderedMessage {
    let owner = item.as_ref().and_then(|item| item.user());

    RenderedMessage::builder()
        .author_name(owner.and_then(|user| user.display_name()))
        .author_link(owner.and_then(|user| user.url()))
        .title(item.as_ref().and_then(|item| item.title()))
        .title_link(item.as_ref().and_then(|item| item.url()))
        .build()
}

fn render_collaborating(
    actor: &Option<User>,
    item: &Option<Item>,
    target: &Option<Item>,
) -> RenderedMessage {
    let collaborator_link = item
        .as_ref()
        .map(|item| slack_link(item.url(), item.title()))
        .unwrap_or_default();
    let target_link = channel_link(target_channel(target));

    let text = Some(format!(
        "{} added {} as collaborator to {}.",
        actor_link(actor),
        collaborator_link,
        target_link
    ));

    RenderedMessage::builder()
        .author_name(actor.as_ref().and_then(|user| user.display_name()))
        .author_link(actor.as_ref().and_then(|user| user.url()))
        .text(text)
        .title(target.as_ref().and_then(|target| target.title()))
        .title_link(target.as_ref().and_then(|target| target.url()))
        .build()
}

fn count_field(title: &str, count: Option<i64>) -> MessageField {
    MessageField {
        title: title.to_string(),
        value: serde_json::json!(count),
        short: true,
    }
}

fn target_channel(target: &Option<Item>) -> Option<&Channel> {
    match target {
        Some(Item::Channel(channel)) => Some(channel),
        _ => None,
    }
}

// A missing channel still links to the site root so the href stays valid.
fn channel_link(channel: Option<&Channel>) -> String {
    match channel {
        Some(channel) => slack_link(Some(channel.url()), channel.title.clone()),
        None => slack_link(Some(join_url(&[])), None),
    }
}

fn actor_link(actor: &Option<User>) -> String {
    match actor {
        Some(user) => slack_link(user.url(), user.display_name()),
        None => slack_link(None, None),
    }
}

/// Slack's `<url|label>` mrkdwn link. Missing parts render as empty rather
/// than breaking the surrounding sentence.
fn slack_link(url: Option<String>, label: Option<String>) -> String {
    format!(
        "<{}|{}>",
        url.unwrap_or_default(),
        label.unwrap_or_default()
    )
}

fn channel_status_color(channel: &Channel) -> &'static str {
    match channel.status.as_deref() {
        Some(CHANNEL_STATUS_PUBLIC) => PUBLIC_CHANNEL_COLOR,
        Some(CHANNEL_STATUS_PRIVATE) => PRIVATE_CHANNEL_COLOR,
        _ => CLOSED_CHANNEL_COLOR,
    }
}
