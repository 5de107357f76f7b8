use std::time::{Duration, Instant};

/// Default poll interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// Turns irregular poll wake-ups into whole elapsed seconds, carrying the
/// sub-second remainder over to the next call.
#[derive(Debug, Clone)]
pub struct SecondTicker {
    last: Instant,
    carry: Duration,
}

impl SecondTicker {
    pub fn new(now: Instant) -> Self {
        Self {
            last: now,
            carry: Duration::ZERO,
        }
    }

    /// Whole seconds elapsed since the previous call
    pub fn advance(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last) + self.carry;
        self.last = now;
        let secs = elapsed.as_secs();
        self.carry = elapsed - Duration::from_secs(secs);
        u32::try_from(secs).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        assert_eq!(tick_duration(), Duration::from_millis(250));
    }

    #[test]
    fn test_second_ticker_carries_remainder() {
        let start = Instant::now();
        let mut ticker = SecondTicker::new(start);

        assert_eq!(ticker.advance(start + Duration::from_millis(600)), 0);
        assert_eq!(ticker.advance(start + Duration::from_millis(1200)), 1);
        assert_eq!(ticker.advance(start + Duration::from_millis(1900)), 0);
        assert_eq!(ticker.advance(start + Duration::from_millis(3050)), 2);
    }
}
