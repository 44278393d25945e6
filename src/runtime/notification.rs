//! Transport notifications and the channel that carries them.
//!
//! Transport libraries report outcomes from their own callbacks. Those
//! callbacks copy the event into an owned `Notification` and push it through
//! a `NotificationHandle`; the runtime drains the channel one notification per
//! `advance` call.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use heapless::{String, Vec};

use super::registry::MAX_TOPIC_LEN;
use crate::session::Event;

/// Maximum size of an incoming payload carried by a notification.
pub const MAX_INCOMING_PAYLOAD: usize = 512;

/// An owned transport notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The broker accepted the connection.
    Connected,
    /// The connection is gone, or a connect attempt failed.
    Disconnected,
    /// The broker answered a subscribe request.
    SubAck { accepted: bool },
    /// The broker acknowledged a publish (QoS 1 and above only).
    PubAck,
    /// A message arrived on a subscribed topic.
    Message {
        topic: String<MAX_TOPIC_LEN>,
        payload: Vec<u8, MAX_INCOMING_PAYLOAD>,
    },
}

impl Notification {
    /// Copy an incoming message.
    ///
    /// Returns `None` if the topic or payload does not fit.
    pub fn message(topic: &str, payload: &[u8]) -> Option<Self> {
        let mut owned_topic = String::new();
        owned_topic.push_str(topic).ok()?;
        let mut owned_payload = Vec::new();
        owned_payload.extend_from_slice(payload).ok()?;
        Some(Notification::Message {
            topic: owned_topic,
            payload: owned_payload,
        })
    }

    /// Borrow this notification as a session event.
    pub fn as_event(&self) -> Event<'_> {
        match self {
            Notification::Connected => Event::Connected,
            Notification::Disconnected => Event::Disconnected,
            Notification::SubAck { accepted } => Event::SubAck {
                accepted: *accepted,
            },
            Notification::PubAck => Event::PubAck,
            Notification::Message { topic, payload } => Event::Message {
                topic: topic.as_str(),
                payload: payload.as_slice(),
            },
        }
    }
}

pub type NotificationChannel<const DEPTH: usize> =
    Channel<CriticalSectionRawMutex, Notification, DEPTH>;

pub type NotificationSender<'a, const DEPTH: usize> =
    Sender<'a, CriticalSectionRawMutex, Notification, DEPTH>;

pub type NotificationReceiver<'a, const DEPTH: usize> =
    Receiver<'a, CriticalSectionRawMutex, Notification, DEPTH>;

/// A handle that lets transport callbacks report events to the runtime.
///
/// This handle wraps a channel sender and can be copied freely.
#[derive(Clone, Copy)]
pub struct NotificationHandle<'a, const DEPTH: usize> {
    tx: NotificationSender<'a, DEPTH>,
}

impl<'a, const DEPTH: usize> NotificationHandle<'a, DEPTH> {
    pub fn new(tx: NotificationSender<'a, DEPTH>) -> Self {
        Self { tx }
    }

    /// Report a notification, waiting for room in the channel.
    pub async fn notify(&self, notification: Notification) {
        self.tx.send(notification).await;
    }

    /// Report a notification without waiting.
    ///
    /// Returns `false` if the channel is full and the notification was dropped.
    pub fn try_notify(&self, notification: Notification) -> bool {
        let sent = self.tx.try_send(notification).is_ok();
        if !sent {
            warn!("notification channel full, event dropped");
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_copies_topic_and_payload() {
        let notification = Notification::message("simulation", b"{\"x\":1}").unwrap();
        assert_eq!(
            notification.as_event(),
            Event::Message {
                topic: "simulation",
                payload: b"{\"x\":1}",
            }
        );
    }

    #[test]
    fn test_message_rejects_oversized_payload() {
        let payload = [0u8; MAX_INCOMING_PAYLOAD + 1];
        assert!(Notification::message("simulation", &payload).is_none());
    }

    #[test]
    fn test_handle_reports_full_channel() {
        let channel: NotificationChannel<1> = Channel::new();
        let handle = NotificationHandle::new(channel.sender());
        assert!(handle.try_notify(Notification::Connected));
        assert!(!handle.try_notify(Notification::Disconnected));
        assert_eq!(channel.try_receive(), Ok(Notification::Connected));
    }
}
