use std::env;

pub struct Config {}

impl Config {
    pub fn arena_url() -> String {
        Self::read_var_with_default("ARENA_URL", "https://www.are.na")
    }

    pub fn arena_api_url() -> String {
        Self::read_var_with_default("ARENA_API_URL", "https://api.are.na/v2")
    }

    pub fn arena_auth_token() -> Option<String> {
        env::var("ARENA_AUTH_TOKEN").ok()
    }

    pub fn slack_api_url() -> String {
        Self::read_var_with_default("SLACK_API_URL", "https://slack.com/api")
    }

    pub fn slack_bot_token() -> String {
        env::var("SLACK_BOT_TOKEN").expect("SLACK_BOT_TOKEN is not set")
    }

    pub fn request_timeout_in_seconds() -> u64 {
        Self::read_var_with_default("REQUEST_TIMEOUT_IN_SECONDS", "10")
            .parse()
            .expect("REQUEST_TIMEOUT_IN_SECONDS can not be parsed")
    }

    pub fn sync_interval_in_seconds() -> u64 {
        Self::read_var_with_default("SYNC_INTERVAL_IN_SECONDS", "120")
            .parse()
            .expect("SYNC_INTERVAL_IN_SECONDS can not be parsed")
    }

    // Wall-clock budget for walking one feed's pages.
    pub fn sync_timeout_in_seconds() -> u64 {
        Self::read_var_with_default("SYNC_TIMEOUT_IN_SECONDS", "300")
            .parse()
            .expect("SYNC_TIMEOUT_IN_SECONDS can not be parsed")
    }

    fn read_var_with_default(name: &str, default_value: &str) -> String {
        env::var(name).unwrap_or_else(|_| default_value.to_string())
    }
}
