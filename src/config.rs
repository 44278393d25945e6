//! # Session Configuration
//!
//! Everything here is fixed when the session is constructed; nothing is
//! mutable at runtime.

use core::fmt::Write;

use embassy_time::Duration;
use heapless::String;

use crate::backoff::Backoff;
use crate::error::SessionError;

/// Maximum length of the client identity presented to the broker.
pub const MAX_CLIENT_ID_LEN: usize = 64;

/// The identity string registered with the transport.
pub type ClientId = String<MAX_CLIENT_ID_LEN>;

/// Broker and timing parameters of a session.
///
/// # Example
///
/// ```
/// use embassy_time::Duration;
/// use mote_session::SessionConfig;
///
/// let config = SessionConfig::new("fd00::1", 1883)
///     .with_publish_period(Duration::from_secs(10))
///     .with_max_backoff_exponent(6);
/// assert_eq!(config.keep_alive_secs(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionConfig {
    /// Broker address, passed verbatim to the transport.
    pub broker_address: &'static str,
    /// Broker port.
    pub broker_port: u16,
    /// Delay before the first reconnect; doubles on every following attempt.
    pub reconnect_interval: Duration,
    /// Cap on the backoff exponent.
    pub max_backoff_exponent: u32,
    /// Interval between publishes while subscribed.
    pub publish_period: Duration,
    /// Interval between reachability checks while the network is down.
    pub network_retry_interval: Duration,
    /// Interval between wake-ups while waiting for the transport to connect.
    pub connect_poll_interval: Duration,
    /// Toggle period of the disconnection indicator.
    pub blink_period: Duration,
    /// How long the publish indicator stays on after a publish.
    pub publish_pulse: Duration,
}

impl SessionConfig {
    pub const DEFAULT_BROKER_ADDRESS: &'static str = "fd00::1";
    pub const DEFAULT_BROKER_PORT: u16 = 1883;

    /// Create a configuration for the given broker with default timings.
    pub const fn new(broker_address: &'static str, broker_port: u16) -> Self {
        Self {
            broker_address,
            broker_port,
            reconnect_interval: Duration::from_secs(1),
            max_backoff_exponent: 6,
            publish_period: Duration::from_secs(10),
            network_retry_interval: Duration::from_secs(1),
            connect_poll_interval: Duration::from_secs(1),
            blink_period: Duration::from_secs(1),
            publish_pulse: Duration::from_millis(333),
        }
    }

    pub const fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    pub const fn with_max_backoff_exponent(mut self, exponent: u32) -> Self {
        self.max_backoff_exponent = exponent;
        self
    }

    pub const fn with_publish_period(mut self, period: Duration) -> Self {
        self.publish_period = period;
        self
    }

    pub const fn with_network_retry_interval(mut self, interval: Duration) -> Self {
        self.network_retry_interval = interval;
        self
    }

    pub const fn with_connect_poll_interval(mut self, interval: Duration) -> Self {
        self.connect_poll_interval = interval;
        self
    }

    pub const fn with_blink_period(mut self, period: Duration) -> Self {
        self.blink_period = period;
        self
    }

    pub const fn with_publish_pulse(mut self, pulse: Duration) -> Self {
        self.publish_pulse = pulse;
        self
    }

    /// The reconnect schedule described by this configuration.
    pub const fn backoff(&self) -> Backoff {
        Backoff::new(self.reconnect_interval, self.max_backoff_exponent)
    }

    /// Keep-alive handed to the broker: three publish periods, in whole seconds.
    ///
    /// Never zero, since a zero keep-alive turns the broker's liveness check off.
    pub const fn keep_alive_secs(&self) -> u16 {
        let secs = self.publish_period.as_millis().saturating_mul(3) / 1000;
        if secs == 0 {
            1
        } else if secs > u16::MAX as u64 {
            u16::MAX
        } else {
            secs as u16
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BROKER_ADDRESS, Self::DEFAULT_BROKER_PORT)
    }
}

/// Copy an identity string into a [`ClientId`].
pub fn client_id(identity: &str) -> Result<ClientId, SessionError> {
    let mut id = ClientId::new();
    id.push_str(identity)
        .map_err(|_| SessionError::IdentityTooLong)?;
    Ok(id)
}

/// Derive the client identity from an 8-byte link-layer address.
///
/// Uses bytes 0, 1, 2, 5, 6 and 7 as lowercase hex, skipping the two
/// filler bytes of an EUI-64 built from a MAC-48.
pub fn client_id_from_link_addr(addr: &[u8; 8]) -> ClientId {
    let mut id = ClientId::new();
    for byte in [addr[0], addr[1], addr[2], addr[5], addr[6], addr[7]] {
        // 12 hex digits always fit in MAX_CLIENT_ID_LEN.
        let _ = write!(id, "{:02x}", byte);
    }
    id
}
