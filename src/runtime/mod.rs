//! Session Runtime Module
//!
//! Everything around the state machine that is not a decision: the module
//! trait for business logic, the payload writer, topic storage, the
//! notification channel and the async driver loop.
//!
//! # Overview
//!
//! Firmware wires the pieces together like this:
//!
//! - transport callbacks push [`Notification`]s through a
//!   [`NotificationHandle`];
//! - a [`SessionRuntime`] owns the receiving end, sleeps until the session's
//!   next deadline or the next notification, and calls `advance`;
//! - the session calls into the [`SessionModule`] to build outgoing payloads
//!   and to handle incoming ones.
//!
//! # Publishing Pattern
//!
//! Modules never perform I/O directly. They fill a [`PayloadWriter`] and the
//! session publishes it after the module returns.

pub(crate) mod event_loop;
pub(crate) mod notification;
pub(crate) mod publisher;
pub(crate) mod registry;
pub(crate) mod traits;

pub use event_loop::SessionRuntime;
pub use notification::{
    MAX_INCOMING_PAYLOAD, Notification, NotificationChannel, NotificationHandle,
    NotificationReceiver, NotificationSender,
};
pub use publisher::PayloadWriter;
pub use registry::{MAX_TOPIC_LEN, SessionTopics};
pub use traits::SessionModule;
