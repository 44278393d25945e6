//! # MQTT Session Lifecycle for Embedded Motes
//!
//! `mote-session` is a `no_std` state machine that keeps a sensor mote
//! subscribed and publishing to a single MQTT broker over a link that comes
//! and goes, built upon the [Embassy](https://embassy.dev/) timing primitives.
//!
//! ## Core Features
//!
//! - **`no_std` & `no_alloc`:** Designed to run on bare-metal microcontrollers without requiring a
//!   standard library or dynamic memory allocation. Buffers are managed using `heapless`
//!   and const generics.
//! - **Never blocks:** A single `advance` entry point consumes one tick or one transport
//!   notification and returns the delay until the next wake-up.
//! - **Automatic recovery:** Disconnections restart the lifecycle with an exponential,
//!   capped reconnect backoff.
//! - **One timer:** The periodic wake-up, the disconnection blink and the publish pulse are
//!   multiplexed onto a single driver sleep.
//! - **Transport Agnostic:** The MQTT library is reached through the `SessionTransport`
//!   trait and reports back through `Notification`s.
//!
//! ## Architecture
//!
//! ### 1. Direct Session Usage
//!
//! Drive the session from any scheduler by calling `advance` on every wake-up:
//!
//! ```ignore
//! let mut session: Session<_, _, _, _, 512> =
//!     Session::new(config, client_id, topics, transport, stack, module, leds);
//! session.start(Instant::now());
//! loop {
//!     let event = wait_for_tick_or_notification().await;
//!     if let Err(err) = session.advance(Instant::now(), event.as_event()) {
//!         break;
//!     }
//! }
//! ```
//!
//! ### 2. Runtime Driver
//!
//! Or hand it to `SessionRuntime`, which does the waiting with Embassy:
//!
//! ```ignore
//! use mote_session::runtime::{NotificationChannel, SessionRuntime};
//!
//! static NOTIFICATIONS: NotificationChannel<4> = NotificationChannel::new();
//!
//! let mut runtime = SessionRuntime::new(&mut session, NOTIFICATIONS.receiver());
//! let err = runtime.run().await;
//! ```
//!
//! ## Lifecycle
//!
//! `Boot → Init → NetOk → Connecting → Connected → Subscribed`, with every state after
//! `Boot` falling back through `Disconnected` to `Init` when the transport reports a lost
//! connection. A full subscribe queue is the only fatal condition; it ends the session in
//! `Stopped`.

#![no_std]

#[macro_use]
mod fmt;

pub mod backoff;
pub mod config;
pub mod error;
pub mod indicator;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod transport;
pub mod util;

// Re-export key types for easier access at the crate root.
pub use backoff::Backoff;
pub use config::{ClientId, SessionConfig};
pub use error::SessionError;
pub use session::{Event, Session, State};
pub use transport::{NetworkProbe, QoS, SessionTransport};
