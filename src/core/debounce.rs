//! Trailing-edge debouncer.
//!
//! Window resizes arrive in bursts. Each notification pushes the trigger time
//! out by `delay`; `tick` fires once after the burst has been quiet for the
//! whole window.
//!
//! Immediate-mode friendly: nothing runs on its own, the owner calls
//! `tick()` from its update loop.

use std::time::{Duration, Instant};

/// Default resize debounce window
pub const RESIZE_DEBOUNCE_MS: u64 = 50;

/// Debouncer with an explicit clock.
///
/// # Usage
/// ```ignore
/// // On every resize notification:
/// debouncer.schedule();
///
/// // In update loop:
/// if debouncer.tick() {
///     recompute();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Quiet period before firing
    delay: Duration,
    /// Pending trigger time
    pending: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE_MS)
    }
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            pending: None,
        }
    }

    /// Arm (or re-arm) relative to wall clock
    pub fn schedule(&mut self) {
        self.schedule_at(Instant::now());
    }

    /// Arm (or re-arm) relative to `now`. Re-arming restarts the window.
    pub fn schedule_at(&mut self, now: Instant) {
        let trigger_at = now + self.delay;
        // Late-arriving timestamps never pull the trigger earlier
        self.pending = Some(match self.pending {
            Some(current) if current > trigger_at => current,
            _ => trigger_at,
        });
        log::trace!("Debouncer: armed for {}ms", self.delay.as_millis());
    }

    pub fn cancel(&mut self) {
        if self.pending.is_some() {
            log::trace!("Debouncer: cancelled");
        }
        self.pending = None;
    }

    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// True once the window has elapsed at `now`. Clears the pending state.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        let Some(trigger_at) = self.pending else {
            return false;
        };

        if now >= trigger_at {
            self.pending = None;
            log::trace!("Debouncer: fired");
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until firing (zero if overdue), None if idle
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|t| t.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_immediate_no_trigger() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(50);

        d.schedule_at(t0);
        assert!(d.is_pending());
        assert!(!d.tick_at(t0));
        assert!(!d.tick_at(t0 + ms(49)));
    }

    #[test]
    fn test_trigger_after_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(50);

        d.schedule_at(t0);
        assert!(d.tick_at(t0 + ms(50)));
        assert!(!d.is_pending());
        // Fires once
        assert!(!d.tick_at(t0 + ms(100)));
    }

    #[test]
    fn test_burst_fires_once_after_last() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(50);

        for i in 0..10 {
            d.schedule_at(t0 + ms(i * 5));
        }
        // Last notification at +45, window closes at +95
        assert!(!d.tick_at(t0 + ms(90)));
        assert!(d.tick_at(t0 + ms(95)));
        assert!(!d.tick_at(t0 + ms(200)));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(50);

        d.schedule_at(t0);
        d.cancel();
        assert!(!d.tick_at(t0 + ms(500)));
        assert_eq!(d.remaining_at(t0), None);
    }

    #[test]
    fn test_remaining() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(50);

        d.schedule_at(t0);
        assert_eq!(d.remaining_at(t0 + ms(20)), Some(ms(30)));
        assert_eq!(d.remaining_at(t0 + ms(80)), Some(Duration::ZERO));
    }

    #[test]
    fn test_wall_clock_tick() {
        let mut d = Debouncer::new(10);
        d.schedule();
        assert!(!d.tick());
        std::thread::sleep(ms(15));
        assert!(d.tick());
    }
}
