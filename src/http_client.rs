use crate::config::Config;
use isahc::config::RedirectPolicy;
use isahc::prelude::*;
use isahc::HttpClient;
use std::sync::OnceLock;
use std::time::Duration;

/// Sent with every request to either API side.
pub const USER_AGENT: &str = "arena_relay";

static CLIENT: OnceLock<HttpClient> = OnceLock::new();

/// Shared client for Are.na reads and Slack posts. The relay identifies
/// itself once here instead of per request.
pub fn client() -> &'static HttpClient {
    CLIENT.get_or_init(init_client)
}

fn init_client() -> HttpClient {
    HttpClient::builder()
        .default_header("User-Agent", USER_AGENT)
        .redirect_policy(RedirectPolicy::Limit(10))
        .timeout(request_timeout())
        .build()
        .unwrap()
}

fn request_timeout() -> Duration {
    Duration::from_secs(Config::request_timeout_in_seconds())
}
