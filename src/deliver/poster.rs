use crate::deliver::render_message::RenderedMessage;
#[cfg(test)]
use mockall::automock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostError {
    pub msg: String,
}

/// Destination side of the relay. Delivery is at-least-once per call; there
/// is no idempotency key on posted messages.
#[cfg_attr(test, automock)]
pub trait Poster: Send + Sync {
    fn post(&self, channel_id: &str, message: &RenderedMessage) -> Result<(), PostError>;
}
