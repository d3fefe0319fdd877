use crate::config::Config;
use crate::deliver::poster::{PostError, Poster};
use crate::deliver::render_message::RenderedMessage;
use crate::http_client;
use isahc::prelude::*;
use isahc::Request;
use serde::{Deserialize, Serialize};

/// Posts rendered messages with Slack's `chat.postMessage`, one attachment
/// per message.
#[derive(Debug, Clone)]
pub struct SlackClient {
    api_url: String,
    token: String,
}

#[derive(Serialize)]
struct PostMessageParams<'a> {
    channel: &'a str,
    as_user: bool,
    attachments: Vec<&'a RenderedMessage>,
}

#[derive(Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackClient {
    pub fn new(token: String) -> Self {
        Self {
            api_url: Config::slack_api_url(),
            token,
        }
    }

    pub fn with_api_url(api_url: String, token: String) -> Self {
        Self { api_url, token }
    }
}

impl Poster for SlackClient {
    fn post(&self, channel_id: &str, message: &RenderedMessage) -> Result<(), PostError> {
        let url = format!("{}/chat.postMessage", self.api_url);

        let params = PostMessageParams {
            channel: channel_id,
            as_user: true,
            attachments: vec![message],
        };

        let body = serde_json::to_vec(&params).map_err(|error| PostError {
            msg: format!("{error:?}"),
        })?;

        let request = Request::post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json; charset=utf-8")
            .body(body)
            .map_err(|_| PostError {
                msg: format!("Invalid URL {url}"),
            })?;

        let mut response = http_client::client()
            .send(request)
            .map_err(|error| PostError {
                msg: format!("{error:?}"),
            })?;

        let code = response.status().as_u16();

        if code != 200 {
            return Err(PostError {
                msg: format!("Slack responded with {code}"),
            });
        }

        let text = response.text().map_err(|error| PostError {
            msg: format!("{error:?}"),
        })?;

        let parsed: PostMessageResponse =
            serde_json::from_str(&text).map_err(|error| PostError {
                msg: format!("{error:?}"),
            })?;

        if parsed.ok {
            Ok(())
        } else {
            Err(PostError {
                msg: parsed.error.unwrap_or_else(|| "unknown error".to_string()),
            })
        }
    }
}
