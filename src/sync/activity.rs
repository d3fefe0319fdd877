//! Classifies raw feed stories by their `action` tag.
//!
//! Dispatch is strict on the fixed action vocabulary; anything else is
//! `Unsupported`, which callers drop and log instead of failing the sync.
//! Missing nested fields are carried through as `None` and resolved by the
//! renderer's optionality.

use crate::arena::schema::{Item, Story, User};

pub const ACTION_ADDED: &str = "added";
pub const ACTION_FOLLOWED: &str = "followed";
pub const ACTION_COMMENTED: &str = "commented on";
pub const ACTION_CREATED: &str = "created";
pub const ACTION_COLLABORATING: &str = "is collaborating with";

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedActivity {
    /// A block or a nested channel connected to a channel.
    Added { item: Option<Item>, target: Option<Item> },
    /// A channel or user followed by the actor; there is no target.
    Followed { actor: Option<User>, item: Option<Item> },
    /// A comment on a block; the target is the commented-on block.
    Commented {
        actor: Option<User>,
        item: Option<Item>,
        target: Option<Item>,
    },
    /// A newly created channel; the channel carries its owner.
    Created { item: Option<Item> },
    /// A collaborator added to a channel.
    Collaborating {
        actor: Option<User>,
        item: Option<Item>,
        target: Option<Item>,
    },
    Unsupported { action: String },
}

pub fn classify(story: Story) -> ClassifiedActivity {
    let action = story.action.clone().unwrap_or_default();

    match action.as_str() {
        ACTION_ADDED => ClassifiedActivity::Added {
            item: story.item,
            target: story.target,
        },
        ACTION_FOLLOWED => ClassifiedActivity::Followed {
            actor: story.user,
            item: story.item,
        },
        ACTION_COMMENTED => ClassifiedActivity::Commented {
            actor: story.user,
            item: story.item,
            target: story.target,
        },
        ACTION_CREATED => ClassifiedActivity::Created { item: story.item },
        ACTION_COLLABORATING => ClassifiedActivity::Collaborating {
            actor: story.user,
            item: story.item,
            target: story.target,
        },
        _ => ClassifiedActivity::Unsupported { action },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn story(value: serde_json::Value) -> Story {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn it_classifies_an_added_block() {
        let classified = classify(story(json!({
            "action": "added",
            "created_at": "2024-05-01T10:00:00Z",
            "item": { "base_class": "Block", "id": 99 },
            "target": { "base_class": "Channel", "id": 5, "slug": "cool-things" }
        })));

        match classified {
            ClassifiedActivity::Added { item, target } => {
                assert!(matches!(item, Some(Item::Block(_))));
                assert!(matches!(target, Some(Item::Channel(_))));
            }
            other => panic!("expected added, got {:?}", other),
        }
    }

    #[test]
    fn it_classifies_a_followed_user() {
        let classified = classify(story(json!({
            "action": "followed",
            "user": { "id": 1, "slug": "pete" },
            "item": { "base_class": "User", "id": 2, "slug": "mikki" }
        })));

        match classified {
            ClassifiedActivity::Followed { actor, item } => {
                assert_eq!(actor.unwrap().id, 1);
                assert!(matches!(item, Some(Item::User(_))));
            }
            other => panic!("expected followed, got {:?}", other),
        }
    }

    #[test]
    fn it_marks_unknown_actions_as_unsupported() {
        let classified = classify(story(json!({ "action": "mentioned you" })));

        assert_eq!(
            classified,
            ClassifiedActivity::Unsupported {
                action: "mentioned you".to_string()
            }
        );
    }

    #[test]
    fn it_does_not_fail_on_a_bare_story() {
        let classified = classify(story(json!({ "action": "added" })));

        assert_eq!(
            classified,
            ClassifiedActivity::Added {
                item: None,
                target: None
            }
        );
    }

    #[test]
    fn a_missing_action_is_unsupported() {
        let classified = classify(story(json!({})));

        assert_eq!(
            classified,
            ClassifiedActivity::Unsupported {
                action: String::new()
            }
        );
    }
}
