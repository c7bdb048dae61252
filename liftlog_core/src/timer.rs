//! Rest timer countdown.
//!
//! Pure state driven by one-second ticks from the caller's event loop. Only
//! one countdown exists at a time; starting while one is running restarts it
//! at the new duration.

/// Countdown between sets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestTimer {
    remaining: Option<u32>,
}

impl RestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the countdown at `seconds`
    pub fn start(&mut self, seconds: u32) {
        self.remaining = Some(seconds);
        tracing::debug!("Rest timer started at {}s", seconds);
    }

    /// Advance by one second, clearing on reaching zero
    ///
    /// Returns the remaining seconds, or None once cleared.
    pub fn tick(&mut self) -> Option<u32> {
        self.remaining = match self.remaining {
            Some(secs) if secs > 1 => Some(secs - 1),
            _ => None,
        };
        self.remaining
    }

    /// Clear the countdown immediately
    pub fn skip(&mut self) {
        if self.remaining.take().is_some() {
            tracing::debug!("Rest timer skipped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Seconds left, if a countdown is running
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_to_clear() {
        let mut timer = RestTimer::new();
        timer.start(3);

        assert_eq!(timer.tick(), Some(2));
        assert_eq!(timer.tick(), Some(1));
        assert_eq!(timer.tick(), None);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_n_ticks_clears_timer_started_at_n() {
        let n = 90;
        let mut timer = RestTimer::new();
        timer.start(n);

        for _ in 0..n {
            timer.tick();
        }
        assert_eq!(timer.remaining(), None);
    }

    #[test]
    fn test_skip_clears_immediately() {
        let mut timer = RestTimer::new();
        timer.start(90);
        timer.tick();

        timer.skip();
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), None);
    }

    #[test]
    fn test_restart_while_running_resets_duration() {
        let mut timer = RestTimer::new();
        timer.start(90);
        timer.tick();
        timer.tick();

        timer.start(90);
        assert_eq!(timer.remaining(), Some(90));
    }

    #[test]
    fn test_tick_when_idle_is_noop() {
        let mut timer = RestTimer::new();
        assert_eq!(timer.tick(), None);
        assert!(!timer.is_running());
    }
}
