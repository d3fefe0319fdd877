use crate::arena::schema::FeedKind;
use crate::models::FeedSubscription;
use crate::store::{FeedLookup, StoreError, SubscriptionStore};
use std::sync::Mutex;

/// In-memory subscription store. Enforces the same uniqueness invariant a
/// database index would.
#[derive(Default)]
pub struct MemoryStore {
    subscriptions: Mutex<Vec<FeedSubscription>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(
        subscription: &FeedSubscription,
        kind: FeedKind,
        team_id: &str,
        lookup: &FeedLookup,
        channel_id: &str,
    ) -> bool {
        if subscription.kind != kind
            || subscription.team_id != team_id
            || subscription.channel_id != channel_id
        {
            return false;
        }

        match lookup {
            FeedLookup::Id(id) => subscription.remote_id == *id,
            FeedLookup::Slug(slug) => subscription.remote_slug.as_deref() == Some(slug.as_str()),
        }
    }
}

impl SubscriptionStore for MemoryStore {
    fn create(&self, subscription: FeedSubscription) -> Result<FeedSubscription, StoreError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();

        let duplicate = subscriptions.iter().any(|existing| {
            existing.kind == subscription.kind
                && existing.team_id == subscription.team_id
                && existing.remote_id == subscription.remote_id
                && existing.channel_id == subscription.channel_id
        });

        if duplicate {
            return Err(StoreError::AlreadyExists);
        }

        subscriptions.push(subscription.clone());

        Ok(subscription)
    }

    fn find(
        &self,
        kind: FeedKind,
        team_id: &str,
        lookup: &FeedLookup,
        channel_id: &str,
    ) -> Option<FeedSubscription> {
        self.subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|subscription| Self::matches(subscription, kind, team_id, lookup, channel_id))
            .cloned()
    }

    fn list_for_team(
        &self,
        team_id: &str,
        channel_id: Option<&str>,
        kind: Option<FeedKind>,
    ) -> Vec<FeedSubscription> {
        self.subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|subscription| subscription.team_id == team_id)
            .filter(|subscription| {
                channel_id.map_or(true, |channel_id| subscription.channel_id == channel_id)
            })
            .filter(|subscription| kind.map_or(true, |kind| subscription.kind == kind))
            .cloned()
            .collect()
    }

    fn team_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .map(|subscription| subscription.team_id.clone())
            .collect();

        ids.sort();
        ids.dedup();

        ids
    }

    fn update(&self, subscription: &FeedSubscription) -> Result<(), StoreError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();

        match subscriptions
            .iter_mut()
            .find(|existing| existing.external_id == subscription.external_id)
        {
            Some(existing) => {
                let mut updated = subscription.clone();
                updated.updated_at = crate::current_time();
                *existing = updated;

                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn delete(&self, subscription: &FeedSubscription) -> Result<(), StoreError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let initial_len = subscriptions.len();

        subscriptions.retain(|existing| existing.external_id != subscription.external_id);

        if subscriptions.len() == initial_len {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(team_id: &str, remote_id: i64, channel_id: &str) -> FeedSubscription {
        FeedSubscription::builder()
            .kind(FeedKind::Channel)
            .remote_id(remote_id)
            .remote_slug(Some("cool-things".to_string()))
            .team_id(team_id)
            .channel_id(channel_id)
            .build()
    }

    #[test]
    fn it_rejects_a_duplicate_subscription() {
        let store = MemoryStore::new();

        store.create(subscription("T1", 5, "C1")).unwrap();
        let result = store.create(subscription("T1", 5, "C1"));

        assert_eq!(result.unwrap_err(), StoreError::AlreadyExists);
    }

    #[test]
    fn the_same_feed_can_go_to_another_channel_or_team() {
        let store = MemoryStore::new();

        store.create(subscription("T1", 5, "C1")).unwrap();
        assert!(store.create(subscription("T1", 5, "C2")).is_ok());
        assert!(store.create(subscription("T2", 5, "C1")).is_ok());
    }

    #[test]
    fn it_finds_by_id_and_falls_back_to_slug() {
        let store = MemoryStore::new();
        store.create(subscription("T1", 5, "C1")).unwrap();

        let by_id = store.find(FeedKind::Channel, "T1", &FeedLookup::Id(5), "C1");
        let by_slug = store.find(
            FeedKind::Channel,
            "T1",
            &FeedLookup::Slug("cool-things".to_string()),
            "C1",
        );

        assert!(by_id.is_some());
        assert!(by_slug.is_some());
        assert_eq!(by_id, by_slug);
    }

    #[test]
    fn it_updates_the_cursor_in_place() {
        let store = MemoryStore::new();
        let mut created = store.create(subscription("T1", 5, "C1")).unwrap();

        created.last_synced_at = Some(crate::current_time());
        store.update(&created).unwrap();

        let found = store
            .find(FeedKind::Channel, "T1", &FeedLookup::Id(5), "C1")
            .unwrap();
        assert!(found.last_synced_at.is_some());
    }

    #[test]
    fn it_deletes_a_subscription() {
        let store = MemoryStore::new();
        let created = store.create(subscription("T1", 5, "C1")).unwrap();

        store.delete(&created).unwrap();

        assert!(store
            .find(FeedKind::Channel, "T1", &FeedLookup::Id(5), "C1")
            .is_none());
        assert_eq!(store.delete(&created).unwrap_err(), StoreError::NotFound);
    }

    #[test]
    fn it_lists_team_ids_once() {
        let store = MemoryStore::new();
        store.create(subscription("T1", 5, "C1")).unwrap();
        store.create(subscription("T1", 6, "C1")).unwrap();
        store.create(subscription("T2", 5, "C1")).unwrap();

        assert_eq!(store.team_ids(), vec!["T1".to_string(), "T2".to_string()]);
    }
}
