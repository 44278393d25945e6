//! The driver loop.
//!
//! Pure mechanism: sleep until the session's earliest timer or the next
//! transport notification, feed whichever came first to
//! [`Session::advance`], repeat. Every decision is made by the session.

use embassy_futures::select::{Either, select};
use embassy_time::{Instant, Timer};

use super::notification::NotificationReceiver;
use super::traits::SessionModule;
use crate::error::SessionError;
use crate::indicator::StatusIndicator;
use crate::session::{Event, Session};
use crate::transport::{NetworkProbe, SessionTransport};

/// Runs a session until it stops.
///
/// # Example
///
/// ```ignore
/// static NOTIFICATIONS: NotificationChannel<4> = Channel::new();
///
/// #[embassy_executor::task]
/// async fn session_task(session: &'static mut MoteSession) {
///     let mut runtime = SessionRuntime::new(session, NOTIFICATIONS.receiver());
///     let err = runtime.run().await;
///     defmt::error!("session ended: {}", err);
/// }
/// ```
pub struct SessionRuntime<'s, 'ch, T, N, M, I, const PAYLOAD_SIZE: usize, const DEPTH: usize> {
    session: &'s mut Session<T, N, M, I, PAYLOAD_SIZE>,
    notifications: NotificationReceiver<'ch, DEPTH>,
}

impl<'s, 'ch, T, N, M, I, const PAYLOAD_SIZE: usize, const DEPTH: usize>
    SessionRuntime<'s, 'ch, T, N, M, I, PAYLOAD_SIZE, DEPTH>
where
    T: SessionTransport,
    N: NetworkProbe,
    M: SessionModule,
    I: StatusIndicator,
{
    pub fn new(
        session: &'s mut Session<T, N, M, I, PAYLOAD_SIZE>,
        notifications: NotificationReceiver<'ch, DEPTH>,
    ) -> Self {
        Self {
            session,
            notifications,
        }
    }

    /// Start the session and drive it until `advance` reports a stop.
    ///
    /// Returns the error that ended the session.
    pub async fn run(&mut self) -> SessionError {
        self.session.start(Instant::now());

        loop {
            let deadline = self.session.next_deadline().unwrap_or(Instant::MAX);
            let result =
                match select(Timer::at(deadline), self.notifications.receive()).await {
                    Either::First(()) => self.session.advance(Instant::now(), Event::Tick),
                    Either::Second(notification) => self
                        .session
                        .advance(Instant::now(), notification.as_event()),
                };

            if let Err(err) = result {
                error!("Session loop exiting: {:?}", err);
                return err;
            }
        }
    }

    pub fn session(&self) -> &Session<T, N, M, I, PAYLOAD_SIZE> {
        self.session
    }
}
