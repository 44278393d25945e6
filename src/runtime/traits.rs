//! Session module trait.
//!
//! A `SessionModule` holds the business logic of a mote: what to publish and
//! what to do with incoming messages. The session decides *when*; the module
//! decides *what*.
//!
//! # Object Safety
//!
//! The trait is dyn-compatible, so firmware can keep a
//! `&mut dyn SessionModule` in a `StaticCell` and hand it to the runtime task
//! without making the task generic over the concrete module.

use super::publisher::PayloadWriter;

/// Business logic plugged into the session.
///
/// # Example
///
/// ```
/// use core::fmt::Write;
/// use mote_session::runtime::{PayloadWriter, SessionModule};
/// use mote_session::util::json_field;
///
/// struct WaterLevel {
///     level: u32,
///     balance_flow: i32,
/// }
///
/// impl SessionModule for WaterLevel {
///     fn build_message(&mut self, out: &mut PayloadWriter<'_>) {
///         let _ = write!(out, r#"{{"n":"water-level","v":{}}}"#, self.level);
///     }
///
///     fn on_message(&mut self, _topic: &str, payload: &[u8]) {
///         if let Ok(flow) = json_field::<i32>(payload, "balance-flow") {
///             self.balance_flow = flow;
///         }
///     }
/// }
/// ```
pub trait SessionModule {
    /// Write the next outgoing payload.
    ///
    /// Called once per publish cycle while subscribed. Whatever the writer
    /// holds when this returns is published, so the payload always reflects
    /// the state at the moment of publishing.
    fn build_message(&mut self, out: &mut PayloadWriter<'_>);

    /// Handle a message received on the subscribed topic.
    ///
    /// The payload is passed through untouched; validating it is up to the
    /// module.
    fn on_message(&mut self, topic: &str, payload: &[u8]);

    /// Called after every successful subscription.
    fn on_subscribed(&mut self) {}
}

/// Blanket implementation for mutable references to trait objects.
///
/// This allows using `&mut dyn SessionModule` wherever `SessionModule` is expected.
impl<M: SessionModule + ?Sized> SessionModule for &mut M {
    fn build_message(&mut self, out: &mut PayloadWriter<'_>) {
        (**self).build_message(out)
    }

    fn on_message(&mut self, topic: &str, payload: &[u8]) {
        (**self).on_message(topic, payload)
    }

    fn on_subscribed(&mut self) {
        (**self).on_subscribed()
    }
}
