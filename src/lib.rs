pub mod arena;
pub mod commands;
pub mod config;
pub mod deliver;
pub mod http_client;
pub mod models;
pub mod store;
pub mod sync;

pub use config::Config;

use chrono::offset::Utc;
use chrono::DateTime;
use chrono::SubsecRound;

// Truncated, not rounded: a cursor half a second in the future would make
// stories created in that window look already-synced on the next run.
pub fn current_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
