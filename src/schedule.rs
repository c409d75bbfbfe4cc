//! Deferred reload after a workflow configure.
//!
//! The host applies saved widget values after the configure hooks have run,
//! so the preview waits a short delay before reading them. Scheduling again
//! before the deadline moves the deadline; there is never more than one
//! pending reload.

use std::time::Duration;
use web_time::Instant;

/// Single-shot timer polled from `tick`.
#[derive(Debug, Clone)]
pub struct DeferredReload {
    delay: Duration,
    due_at: Option<Instant>,
}

impl DeferredReload {
    /// Default delay between configure and reload.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            due_at: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm (or re-arm) the timer relative to `now`.
    pub fn schedule(&mut self, now: Instant) {
        if self.due_at.is_some() {
            log::trace!("Deferred reload re-armed");
        }
        self.due_at = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.due_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due_at.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.due_at
    }

    /// Disarm and return `true` if the deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.due_at {
            Some(due) if now >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for DeferredReload {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut reload = DeferredReload::default();
        reload.schedule(start);

        assert!(!reload.take_due(start + Duration::from_millis(99)));
        assert!(reload.take_due(start + Duration::from_millis(100)));
        assert!(!reload.take_due(start + Duration::from_millis(500)));
        assert!(!reload.is_pending());
    }

    #[test]
    fn test_reschedule_moves_deadline() {
        let start = Instant::now();
        let mut reload = DeferredReload::new(Duration::from_millis(50));
        reload.schedule(start);
        reload.schedule(start + Duration::from_millis(40));

        assert!(!reload.take_due(start + Duration::from_millis(60)));
        assert!(reload.take_due(start + Duration::from_millis(90)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut reload = DeferredReload::default();
        reload.schedule(start);
        reload.cancel();
        assert_eq!(reload.deadline(), None);
        assert!(!reload.take_due(start + Duration::from_secs(1)));
    }
}
