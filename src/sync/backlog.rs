//! Cursor-driven pagination walker.
//!
//! Feed pages arrive newest first, page 1 being the most recent. With a
//! cursor set, scanning stops at the first story strictly older than it;
//! everything past that point is already synced. Without a cursor the whole
//! history is collected until the feed runs out of pages. The collected
//! stories are replayed oldest first, and the new cursor is the scan-start
//! timestamp so stories created mid-scan are picked up on the next run.

use crate::arena::client::ClientError;
use crate::arena::schema::Story;
use crate::current_time;
use crate::sync::observer::SyncObserver;
use chrono::offset::Utc;
use chrono::DateTime;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkError {
    NotFound,
    Unauthorized,
    Timeout,
    Client { msg: String },
}

impl From<ClientError> for WalkError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::NotFound => WalkError::NotFound,
            ClientError::Unauthorized => WalkError::Unauthorized,
            other => WalkError::Client {
                msg: format!("{other:?}"),
            },
        }
    }
}

#[derive(Debug)]
pub struct Backlog {
    /// Stories newer than the cursor, oldest first.
    pub stories: Vec<Story>,
    /// The timestamp to persist after a successful replay.
    pub cursor: DateTime<Utc>,
}

pub fn collect_backlog<F>(
    mut fetch_page: F,
    cursor: Option<DateTime<Utc>>,
    deadline: Instant,
    feed: &str,
    observer: &dyn SyncObserver,
) -> Result<Backlog, WalkError>
where
    F: FnMut(u32) -> Result<Vec<Story>, ClientError>,
{
    let scan_started_at = current_time();
    let mut stories: Vec<Story> = vec![];
    let mut page = 1;

    'pages: loop {
        if Instant::now() >= deadline {
            return Err(WalkError::Timeout);
        }

        let page_of_stories = fetch_page(page)?;

        if page_of_stories.is_empty() {
            break;
        }

        for story in page_of_stories {
            let timestamp = match story.timestamp() {
                Some(value) => value,
                None => {
                    observer.activity_dropped(feed, "missing or unparseable created_at");
                    continue;
                }
            };

            if let Some(cursor) = cursor {
                if timestamp < cursor {
                    break 'pages;
                }
            }

            stories.push(story);
        }

        page += 1;
    }

    stories.reverse();

    Ok(Backlog {
        stories,
        cursor: scan_started_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::sync_job::BatchStats;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    struct RecordingObserver {
        dropped: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn new() -> Self {
            Self {
                dropped: Mutex::new(vec![]),
            }
        }
    }

    impl SyncObserver for RecordingObserver {
        fn feed_synced(&self, _feed: &str, _posted: usize) {}
        fn feed_skipped(&self, _feed: &str, _reason: &str) {}
        fn feed_failed(&self, _feed: &str, _error: &str) {}
        fn parent_refresh_failed(&self, _feed: &str, _error: &str) {}
        fn batch_finished(&self, _stats: &BatchStats) {}

        fn activity_dropped(&self, _feed: &str, reason: &str) {
            self.dropped.lock().unwrap().push(reason.to_string());
        }
    }

    fn story(created_at: &str) -> Story {
        serde_json::from_value(json!({
            "action": "added",
            "created_at": created_at,
            "item": { "base_class": "Block", "id": 1 }
        }))
        .unwrap()
    }

    fn far_deadline() -> Instant {
        Instant::now() + Duration::from_secs(60)
    }

    fn timestamp(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn a_first_sync_collects_the_full_history_oldest_first() {
        let pages = vec![
            vec![story("2024-05-03T00:00:00Z"), story("2024-05-02T00:00:00Z")],
            vec![story("2024-05-01T00:00:00Z")],
            vec![],
        ];
        let observer = RecordingObserver::new();

        let backlog = collect_backlog(
            |page| Ok(pages[(page - 1) as usize].clone()),
            None,
            far_deadline(),
            "feed",
            &observer,
        )
        .unwrap();

        let timestamps: Vec<_> = backlog
            .stories
            .iter()
            .map(|story| story.created_at.clone().unwrap())
            .collect();

        assert_eq!(
            timestamps,
            vec![
                "2024-05-01T00:00:00Z",
                "2024-05-02T00:00:00Z",
                "2024-05-03T00:00:00Z"
            ]
        );
    }

    #[test]
    fn the_cursor_is_the_scan_start_timestamp() {
        let observer = RecordingObserver::new();
        let before = current_time();

        let backlog =
            collect_backlog(|_| Ok(vec![]), None, far_deadline(), "feed", &observer).unwrap();

        let after = current_time();
        assert!(backlog.cursor >= before);
        assert!(backlog.cursor <= after);
        assert!(backlog.stories.is_empty());
    }

    #[test]
    fn it_stops_at_the_first_story_older_than_the_cursor() {
        let fetched = Mutex::new(0u32);
        let pages = vec![
            vec![story("2024-05-03T00:00:00Z"), story("2024-05-01T00:00:00Z")],
            vec![story("2024-04-30T00:00:00Z")],
        ];
        let observer = RecordingObserver::new();

        let backlog = collect_backlog(
            |page| {
                *fetched.lock().unwrap() += 1;
                Ok(pages[(page - 1) as usize].clone())
            },
            Some(timestamp("2024-05-02T00:00:00Z")),
            far_deadline(),
            "feed",
            &observer,
        )
        .unwrap();

        assert_eq!(backlog.stories.len(), 1);
        assert_eq!(
            backlog.stories[0].created_at.as_deref(),
            Some("2024-05-03T00:00:00Z")
        );
        // The stop is page-global: page 2 is never requested.
        assert_eq!(*fetched.lock().unwrap(), 1);
    }

    #[test]
    fn a_story_equal_to_the_cursor_is_collected() {
        let cursor = timestamp("2024-05-02T00:00:00Z");
        let pages = vec![vec![story("2024-05-02T00:00:00Z")], vec![]];
        let observer = RecordingObserver::new();

        let backlog = collect_backlog(
            |page| Ok(pages[(page - 1) as usize].clone()),
            Some(cursor),
            far_deadline(),
            "feed",
            &observer,
        )
        .unwrap();

        assert_eq!(backlog.stories.len(), 1);
    }

    #[test]
    fn it_drops_stories_without_a_timestamp() {
        let broken: Story = serde_json::from_value(json!({ "action": "added" })).unwrap();
        let pages = vec![vec![story("2024-05-03T00:00:00Z"), broken], vec![]];
        let observer = RecordingObserver::new();

        let backlog = collect_backlog(
            |page| Ok(pages[(page - 1) as usize].clone()),
            None,
            far_deadline(),
            "feed",
            &observer,
        )
        .unwrap();

        assert_eq!(backlog.stories.len(), 1);
        assert_eq!(observer.dropped.lock().unwrap().len(), 1);
    }

    #[test]
    fn an_exceeded_deadline_aborts_the_walk() {
        let observer = RecordingObserver::new();

        let result = collect_backlog(
            |_| Ok(vec![story("2024-05-03T00:00:00Z")]),
            None,
            Instant::now(),
            "feed",
            &observer,
        );

        assert_eq!(result.unwrap_err(), WalkError::Timeout);
    }

    #[test]
    fn a_missing_remote_entity_surfaces_distinctly() {
        let observer = RecordingObserver::new();

        let result = collect_backlog(
            |_| Err(ClientError::NotFound),
            None,
            far_deadline(),
            "feed",
            &observer,
        );

        assert_eq!(result.unwrap_err(), WalkError::NotFound);
    }
}
