//! Reconnect backoff policy.

use embassy_time::Duration;

/// Exponential reconnect schedule with a capped exponent.
///
/// `delay(attempt) = base * 2^min(attempt, max_exponent)`. Once the cap is
/// reached the delay stays constant. The computation saturates instead of
/// overflowing, so very large bases or exponents clamp to [`Duration::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Backoff {
    base: Duration,
    max_exponent: u32,
}

impl Backoff {
    /// Create a schedule from the base interval and the maximum exponent.
    pub const fn new(base: Duration, max_exponent: u32) -> Self {
        Self { base, max_exponent }
    }

    /// The delay for attempt number `attempt` (0-based).
    pub const fn delay(&self, attempt: u32) -> Duration {
        let exponent = if attempt < self.max_exponent {
            attempt
        } else {
            self.max_exponent
        };
        if exponent >= u64::BITS {
            return if self.base.as_ticks() == 0 {
                Duration::from_ticks(0)
            } else {
                Duration::MAX
            };
        }
        let factor = 1u64 << exponent;
        Duration::from_ticks(self.base.as_ticks().saturating_mul(factor))
    }

    pub const fn base(&self) -> Duration {
        self.base
    }

    pub const fn max_exponent(&self) -> u32 {
        self.max_exponent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_until_cap() {
        let backoff = Backoff::new(Duration::from_secs(1), 6);
        assert_eq!(backoff.delay(0), Duration::from_secs(1));
        assert_eq!(backoff.delay(1), Duration::from_secs(2));
        assert_eq!(backoff.delay(2), Duration::from_secs(4));
        assert_eq!(backoff.delay(5), Duration::from_secs(32));
        assert_eq!(backoff.delay(6), Duration::from_secs(64));
        assert_eq!(backoff.delay(7), Duration::from_secs(64));
        assert_eq!(backoff.delay(u32::MAX), Duration::from_secs(64));
    }

    #[test]
    fn test_delay_is_non_decreasing() {
        let backoff = Backoff::new(Duration::from_millis(250), 10);
        let mut previous = backoff.delay(0);
        for attempt in 1..40 {
            let current = backoff.delay(attempt);
            assert!(current >= previous, "attempt {attempt} went backwards");
            previous = current;
        }
    }

    #[test]
    fn test_zero_cap_keeps_base() {
        let backoff = Backoff::new(Duration::from_millis(500), 0);
        for attempt in 0..5 {
            assert_eq!(backoff.delay(attempt), Duration::from_millis(500));
        }
    }

    #[test]
    fn test_huge_exponent_saturates() {
        let backoff = Backoff::new(Duration::from_secs(1), 200);
        assert_eq!(backoff.delay(199), Duration::MAX);
        assert_eq!(Backoff::new(Duration::from_ticks(0), 200).delay(100), Duration::from_ticks(0));
    }
}
