pub mod poster;
pub mod render_message;
pub mod slack_client;

pub use poster::{PostError, Poster};
pub use render_message::{render, render_entity, render_subscription, MessageField, RenderedMessage};
pub use slack_client::SlackClient;
