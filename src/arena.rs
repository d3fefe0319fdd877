pub mod client;
pub mod schema;

pub use client::{ArenaClient, ClientError, HttpArenaClient};
pub use schema::{Block, Channel, Entity, FeedKind, Item, Story, User};
