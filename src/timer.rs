//! Timer multiplexing.
//!
//! The session owns a fixed set of logical timers and the driver loop sleeps
//! until the earliest of them. Every operation takes the current instant
//! explicitly, so nothing here reads a clock.

use embassy_time::{Duration, Instant};

/// The logical timers multiplexed onto the driver's single wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerId {
    /// The periodic wake-up that drives state transitions.
    Wakeup,
    /// Disconnection indicator blink.
    Blink,
    /// Turns the publish indicator back off after a pulse.
    PublishPulse,
}

impl TimerId {
    const COUNT: usize = 3;

    const fn index(self) -> usize {
        match self {
            TimerId::Wakeup => 0,
            TimerId::Blink => 1,
            TimerId::PublishPulse => 2,
        }
    }
}

/// A single timer with at most one pending firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneShot {
    interval: Option<Duration>,
    deadline: Option<Instant>,
}

impl Default for OneShot {
    fn default() -> Self {
        Self::new()
    }
}

impl OneShot {
    pub const fn new() -> Self {
        Self {
            interval: None,
            deadline: None,
        }
    }

    /// Arm the timer to fire `interval` after `now`, replacing any pending firing.
    pub fn arm(&mut self, now: Instant, interval: Duration) {
        self.interval = Some(interval);
        self.deadline = Some(now.checked_add(interval).unwrap_or(Instant::MAX));
    }

    /// Re-arm with the last interval, counted from `now`.
    ///
    /// Does nothing if the timer was never armed.
    pub fn reset(&mut self, now: Instant) {
        if let Some(interval) = self.interval {
            self.arm(now, interval);
        }
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if deadline <= now)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The interval of the last `arm`, if any.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Time left until the deadline, zero when due or disarmed.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.deadline {
            Some(deadline) => deadline.saturating_duration_since(now),
            None => Duration::from_ticks(0),
        }
    }
}

/// All of the session's timers, indexed by [`TimerId`].
#[derive(Debug, Clone)]
pub struct TimerMux {
    timers: [OneShot; TimerId::COUNT],
}

impl Default for TimerMux {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerMux {
    pub const fn new() -> Self {
        Self {
            timers: [OneShot::new(); TimerId::COUNT],
        }
    }

    pub fn arm(&mut self, id: TimerId, now: Instant, interval: Duration) {
        trace!("timer {:?} armed for {} ms", id, interval.as_millis());
        self.timers[id.index()].arm(now, interval);
    }

    pub fn reset(&mut self, id: TimerId, now: Instant) {
        self.timers[id.index()].reset(now);
    }

    pub fn stop(&mut self, id: TimerId) {
        self.timers[id.index()].stop();
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers[id.index()].is_armed()
    }

    pub fn is_due(&self, id: TimerId, now: Instant) -> bool {
        self.timers[id.index()].is_due(now)
    }

    pub fn remaining(&self, id: TimerId, now: Instant) -> Duration {
        self.timers[id.index()].remaining(now)
    }

    pub fn get(&self, id: TimerId) -> &OneShot {
        &self.timers[id.index()]
    }

    /// Stop every timer.
    pub fn stop_all(&mut self) {
        for timer in self.timers.iter_mut() {
            timer.stop();
        }
    }

    /// The earliest pending deadline, if any timer is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().filter_map(OneShot::deadline).min()
    }
}
