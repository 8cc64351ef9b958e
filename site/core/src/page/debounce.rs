//! Trailing-Edge Debouncer
//!
//! Collapses a burst of triggers into one delivery, made once the trigger has
//! been quiet for the configured wait. Time is fed in as frame deltas, the
//! same way the rest of the page state advances.

use std::time::Duration;

/// Quiet period applied to terminal resizes
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Delivers the latest triggered value after a quiet period
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    wait: Duration,
    remaining: Duration,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiet period
    #[must_use]
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            remaining: Duration::ZERO,
            pending: None,
        }
    }

    /// Record a trigger, restarting the quiet period
    pub fn trigger(&mut self, value: T) {
        self.pending = Some(value);
        self.remaining = self.wait;
    }

    /// Advance time; returns the value once the quiet period has elapsed
    pub fn update(&mut self, delta: Duration) -> Option<T> {
        self.pending.as_ref()?;
        self.remaining = self.remaining.saturating_sub(delta);
        if self.remaining.is_zero() {
            self.pending.take()
        } else {
            None
        }
    }

    /// Whether a trigger is waiting to be delivered
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_millis(250);

    #[test]
    fn test_delivers_after_quiet_period() {
        let mut debouncer = Debouncer::new(WAIT);
        debouncer.trigger(80u16);
        assert_eq!(debouncer.update(Duration::from_millis(200)), None);
        assert_eq!(debouncer.update(Duration::from_millis(50)), Some(80));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_burst_delivers_latest_once() {
        let mut debouncer = Debouncer::new(WAIT);
        debouncer.trigger(80u16);
        debouncer.update(Duration::from_millis(200));
        debouncer.trigger(120);
        assert_eq!(debouncer.update(Duration::from_millis(200)), None);
        assert_eq!(debouncer.update(Duration::from_millis(100)), Some(120));
        assert_eq!(debouncer.update(Duration::from_secs(1)), None);
    }

    #[test]
    fn test_idle_debouncer_yields_nothing() {
        let mut debouncer: Debouncer<u16> = Debouncer::new(WAIT);
        assert_eq!(debouncer.update(Duration::from_secs(5)), None);
    }
}
