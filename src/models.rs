pub mod feed_subscription;

pub use feed_subscription::FeedSubscription;
