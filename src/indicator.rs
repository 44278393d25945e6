//! Status indicator output.
//!
//! The session only ever writes to the indicator; nothing it does depends on
//! whether a write succeeded.

use embedded_hal::digital::{OutputPin, StatefulOutputPin};

/// The logical signals the session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    /// Blinks while the session is not subscribed.
    Disconnected,
    /// Pulses once per publish.
    Publish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    On,
    Off,
    Toggle,
}

/// Write-only sink for status signals.
pub trait StatusIndicator {
    fn set(&mut self, signal: Signal, level: Level);
}

impl<I: StatusIndicator + ?Sized> StatusIndicator for &mut I {
    fn set(&mut self, signal: Signal, level: Level) {
        (**self).set(signal, level)
    }
}

/// Indicator for boards without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl StatusIndicator for NoIndicator {
    fn set(&mut self, _signal: Signal, _level: Level) {}
}

/// Two LEDs on `embedded-hal` output pins.
///
/// The disconnection LED blinks, so its pin must be able to toggle.
pub struct LedIndicator<D, P> {
    disconnected: D,
    publish: P,
}

impl<D, P> LedIndicator<D, P>
where
    D: StatefulOutputPin,
    P: OutputPin,
{
    pub fn new(disconnected: D, publish: P) -> Self {
        Self {
            disconnected,
            publish,
        }
    }

    /// Give the pins back.
    pub fn release(self) -> (D, P) {
        (self.disconnected, self.publish)
    }
}

impl<D, P> StatusIndicator for LedIndicator<D, P>
where
    D: StatefulOutputPin,
    P: OutputPin,
{
    fn set(&mut self, signal: Signal, level: Level) {
        let result = match (signal, level) {
            (Signal::Disconnected, Level::On) => self.disconnected.set_high().is_ok(),
            (Signal::Disconnected, Level::Off) => self.disconnected.set_low().is_ok(),
            (Signal::Disconnected, Level::Toggle) => self.disconnected.toggle().is_ok(),
            (Signal::Publish, Level::On) => self.publish.set_high().is_ok(),
            (Signal::Publish, Level::Off) => self.publish.set_low().is_ok(),
            // A plain output pin cannot be read back, so toggling means "on".
            (Signal::Publish, Level::Toggle) => self.publish.set_high().is_ok(),
        };
        if !result {
            debug!("indicator write failed for {:?}", signal);
        }
    }
}
