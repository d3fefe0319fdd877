use arena_relay::arena::client::HttpArenaClient;
use arena_relay::deliver::slack_client::SlackClient;
use arena_relay::store::memory::MemoryStore;
use arena_relay::sync::observer::LogObserver;
use arena_relay::sync::scheduler;
use arena_relay::sync::FeedSyncer;
use arena_relay::Config;
use dotenv::dotenv;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let syncer = FeedSyncer::new(
        Arc::new(HttpArenaClient::new()),
        Arc::new(SlackClient::new(Config::slack_bot_token())),
        Arc::new(MemoryStore::new()),
        Arc::new(LogObserver {}),
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    let signal_flag = shutdown.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Shutting down after the current feed");
            signal_flag.store(true, Ordering::Relaxed);
        }
    });

    scheduler::start(syncer, shutdown).await;
}
