use crate::arena::schema::{Channel, Entity, FeedKind, Story, User};
use crate::config::Config;
use crate::http_client;
use isahc::prelude::*;
use isahc::Request;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    NotFound,
    Unauthorized,
    Http { code: u16, message: String },
    Request { msg: String },
    Parse { msg: String },
}

/// Read side of the Are.na API used by the sync engine.
pub trait ArenaClient: Send + Sync {
    fn fetch_entity(&self, kind: FeedKind, id_or_slug: &str) -> Result<Entity, ClientError>;

    /// One page of a feed, newest first. An empty page signals exhaustion.
    fn fetch_page(&self, kind: FeedKind, id: i64, page: u32) -> Result<Vec<Story>, ClientError>;

    fn search(&self, kind: FeedKind, term: &str, limit: u32)
        -> Result<Vec<Entity>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpArenaClient {
    api_url: String,
    auth_token: Option<String>,
}

#[derive(Deserialize)]
struct FeedPage {
    #[serde(default)]
    stories: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChannelSearchPage {
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Deserialize)]
struct UserSearchPage {
    #[serde(default)]
    users: Vec<User>,
}

impl Default for HttpArenaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpArenaClient {
    pub fn new() -> Self {
        Self {
            api_url: Config::arena_api_url(),
            auth_token: Config::arena_auth_token(),
        }
    }

    pub fn with_api_url(api_url: String) -> Self {
        Self {
            api_url,
            auth_token: None,
        }
    }

    fn get(&self, path: &str) -> Result<String, ClientError> {
        let url = format!("{}/{}", self.api_url, path);

        let mut builder = Request::get(&url);

        if let Some(token) = &self.auth_token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = builder.body(()).map_err(|_| ClientError::Request {
            msg: format!("Invalid URL {url}"),
        })?;

        let mut response =
            http_client::client()
                .send(request)
                .map_err(|error| ClientError::Request {
                    msg: format!("{error:?}"),
                })?;

        match response.status().as_u16() {
            200 => response.text().map_err(|error| ClientError::Request {
                msg: format!("{error:?}"),
            }),
            404 => Err(ClientError::NotFound),
            401 | 403 => Err(ClientError::Unauthorized),
            code => Err(ClientError::Http {
                code,
                message: format!("Unexpected response from {url}"),
            }),
        }
    }

    fn parse<T: serde::de::DeserializeOwned>(&self, body: &str) -> Result<T, ClientError> {
        serde_json::from_str(body).map_err(|error| ClientError::Parse {
            msg: format!("{error:?}"),
        })
    }
}

impl ArenaClient for HttpArenaClient {
    fn fetch_entity(&self, kind: FeedKind, id_or_slug: &str) -> Result<Entity, ClientError> {
        match kind {
            FeedKind::Channel => {
                let body = self.get(&format!("channels/{id_or_slug}"))?;
                let channel: Channel = self.parse(&body)?;

                Ok(Entity::Channel(channel))
            }
            FeedKind::User => {
                let body = self.get(&format!("users/{id_or_slug}"))?;
                let user: User = self.parse(&body)?;

                Ok(Entity::User(user))
            }
        }
    }

    fn fetch_page(&self, kind: FeedKind, id: i64, page: u32) -> Result<Vec<Story>, ClientError> {
        let path = match kind {
            FeedKind::Channel => format!("channels/{id}/feed?page={page}"),
            FeedKind::User => format!("users/{id}/feed?page={page}"),
        };

        let body = self.get(&path)?;
        let feed_page: FeedPage = self.parse(&body)?;

        // One malformed story must not poison the page.
        let mut stories = Vec::with_capacity(feed_page.stories.len());

        for raw in feed_page.stories {
            match serde_json::from_value::<Story>(raw) {
                Ok(story) => stories.push(story),
                Err(error) => {
                    log::warn!("Skipping a malformed story in {kind} {id} feed: {error:?}")
                }
            }
        }

        Ok(stories)
    }

    fn search(
        &self,
        kind: FeedKind,
        term: &str,
        limit: u32,
    ) -> Result<Vec<Entity>, ClientError> {
        match kind {
            FeedKind::Channel => {
                let body = self.get(&format!("search/channels?q={term}&per={limit}"))?;
                let page: ChannelSearchPage = self.parse(&body)?;

                Ok(page.channels.into_iter().map(Entity::Channel).collect())
            }
            FeedKind::User => {
                let body = self.get(&format!("search/users?q={term}&per={limit}"))?;
                let page: UserSearchPage = self.parse(&body)?;

                Ok(page.users.into_iter().map(Entity::User).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::mock;

    fn client() -> HttpArenaClient {
        HttpArenaClient::with_api_url(mockito::server_url())
    }

    #[test]
    fn it_fetches_a_channel() {
        let _m = mock("GET", "/channels/delightfully-absurd")
            .match_header("user-agent", crate::http_client::USER_AGENT)
            .with_status(200)
            .with_body(
                r#"{"id": 5, "title": "Delightfully absurd", "slug": "delightfully-absurd"}"#,
            )
            .create();

        let entity = client()
            .fetch_entity(FeedKind::Channel, "delightfully-absurd")
            .unwrap();

        assert_eq!(entity.id(), 5);
        assert_eq!(entity.title().as_deref(), Some("Delightfully absurd"));
    }

    #[test]
    fn it_maps_missing_entities_to_not_found() {
        let _m = mock("GET", "/users/42").with_status(404).create();

        let result = client().fetch_entity(FeedKind::User, "42");

        assert_eq!(result, Err(ClientError::NotFound));
    }

    #[test]
    fn it_maps_revoked_credentials_to_unauthorized() {
        let _m = mock("GET", "/channels/7/feed?page=1")
            .with_status(401)
            .create();

        let result = client().fetch_page(FeedKind::Channel, 7, 1);

        assert_eq!(result, Err(ClientError::Unauthorized));
    }

    #[test]
    fn it_skips_malformed_stories_in_a_page() {
        let body = r#"{
            "stories": [
                {
                    "action": "added",
                    "created_at": "2024-05-01T10:00:00Z",
                    "item": { "base_class": "Block", "id": 1 }
                },
                { "action": "added", "item": { "base_class": "Spaceship", "id": 2 } }
            ]
        }"#;
        let _m = mock("GET", "/channels/7/feed?page=1")
            .with_status(200)
            .with_body(body)
            .create();

        let stories = client().fetch_page(FeedKind::Channel, 7, 1).unwrap();

        assert_eq!(stories.len(), 1);
    }

    #[test]
    fn it_searches_channels() {
        let _m = mock("GET", "/search/channels?q=absurd&per=10")
            .with_status(200)
            .with_body(r#"{"channels": [{"id": 5, "title": "Delightfully absurd"}]}"#)
            .create();

        let results = client().search(FeedKind::Channel, "absurd", 10).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id(), 5);
    }
}
