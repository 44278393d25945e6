//! Topic storage for the session.

use heapless::String;

use crate::error::SessionError;

/// Maximum length for a single topic string.
pub const MAX_TOPIC_LEN: usize = 64;

/// The publish and subscribe topics of a session.
///
/// Both topics are copied on construction, so callers may build them in
/// temporary buffers. They never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTopics {
    publish: String<MAX_TOPIC_LEN>,
    subscribe: String<MAX_TOPIC_LEN>,
}

impl SessionTopics {
    /// Copy both topics, failing if either is longer than [`MAX_TOPIC_LEN`].
    pub fn new(publish: &str, subscribe: &str) -> Result<Self, SessionError> {
        Ok(Self {
            publish: copy_topic(publish)?,
            subscribe: copy_topic(subscribe)?,
        })
    }

    pub fn publish(&self) -> &str {
        self.publish.as_str()
    }

    pub fn subscribe(&self) -> &str {
        self.subscribe.as_str()
    }
}

fn copy_topic(topic: &str) -> Result<String<MAX_TOPIC_LEN>, SessionError> {
    let mut owned = String::new();
    owned
        .push_str(topic)
        .map_err(|_| SessionError::TopicTooLong)?;
    Ok(owned)
}
