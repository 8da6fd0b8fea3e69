//! Debounce scheduler for filtered-view recomputation.
//!
//! While the host's loading flag is off every change is recomputed on the
//! spot. While it is on, each change (re)starts a one-shot timer and the
//! recompute waits until the timer fires without being restarted, so a burst
//! of keystrokes costs a single filter pass over the latest query.

use std::sync::Arc;
use std::time::Duration;

use horizon_select_core::logging::targets;
use horizon_select_core::{SharedTimerManager, TimerId};

/// Default debounce delay.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// What the caller should do after requesting a recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Recompute now.
    Immediate,
    /// A timer was (re)started; recompute when it fires.
    Deferred(TimerId),
}

/// Coalesces recompute requests while loading.
pub struct DebounceScheduler {
    timers: Arc<SharedTimerManager>,
    delay: Duration,
    loading: bool,
    pending: Option<TimerId>,
}

impl DebounceScheduler {
    /// Create a scheduler on a timer queue.
    pub fn new(timers: Arc<SharedTimerManager>, delay: Duration) -> Self {
        Self {
            timers,
            delay,
            loading: false,
            pending: None,
        }
    }

    /// The timer queue this scheduler uses.
    pub fn timers(&self) -> &Arc<SharedTimerManager> {
        &self.timers
    }

    /// The debounce delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Set the debounce delay. Applies to the next request.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// The host loading flag.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Update the host loading flag.
    ///
    /// Returns `true` when turning loading off dropped a pending timer, in
    /// which case the caller must recompute now.
    pub fn set_loading(&mut self, loading: bool) -> bool {
        self.loading = loading;
        !loading && self.cancel()
    }

    /// Whether a deferred recompute is outstanding.
    ///
    /// This is the externally observable loading-in-progress flag.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The outstanding timer, if any.
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending
    }

    /// Register an input change.
    ///
    /// Any outstanding timer is cancelled first: the newest change always
    /// supersedes the previous one.
    pub fn request(&mut self) -> Schedule {
        self.cancel();
        if !self.loading {
            return Schedule::Immediate;
        }

        let id = self.timers.start_one_shot(self.delay);
        self.pending = Some(id);
        tracing::trace!(target: targets::DEBOUNCE, ?id, delay = ?self.delay, "recompute deferred");
        Schedule::Deferred(id)
    }

    /// Claim a fired timer.
    ///
    /// Returns `true` if `id` is the outstanding timer, meaning the caller
    /// must recompute now. Unknown or superseded ids return `false`.
    pub fn fire(&mut self, id: TimerId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            tracing::trace!(target: targets::DEBOUNCE, ?id, "debounce elapsed");
            true
        } else {
            false
        }
    }

    /// Cancel the outstanding timer. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(id) => {
                // The timer may already have expired in the queue but not been
                // delivered yet; either way it must not be acted on.
                let _ = self.timers.stop(id);
                tracing::trace!(target: targets::DEBOUNCE, ?id, "pending recompute cancelled");
                true
            }
            None => false,
        }
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for DebounceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebounceScheduler")
            .field("delay", &self.delay)
            .field("loading", &self.loading)
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_select_core::ManualClock;

    fn scheduler() -> (Arc<ManualClock>, DebounceScheduler) {
        let clock = Arc::new(ManualClock::new());
        let timers = Arc::new(SharedTimerManager::with_clock(clock.clone()));
        (clock, DebounceScheduler::new(timers, DEFAULT_DEBOUNCE))
    }

    #[test]
    fn test_not_loading_is_immediate() {
        let (_clock, mut debounce) = scheduler();
        assert_eq!(debounce.request(), Schedule::Immediate);
        assert!(!debounce.is_pending());
        assert_eq!(debounce.timers().active_count(), 0);
    }

    #[test]
    fn test_restart_supersedes_previous_timer() {
        let (clock, mut debounce) = scheduler();
        debounce.set_loading(true);

        let Schedule::Deferred(first) = debounce.request() else {
            panic!("expected a deferred recompute");
        };
        clock.advance(Duration::from_millis(200));
        let Schedule::Deferred(second) = debounce.request() else {
            panic!("expected a deferred recompute");
        };
        assert_ne!(first, second);
        assert!(debounce.is_pending());
        assert_eq!(debounce.timers().active_count(), 1);

        clock.advance(Duration::from_millis(999));
        assert!(debounce.timers().process_expired().is_empty());

        clock.advance(Duration::from_millis(1));
        let fired = debounce.timers().process_expired();
        assert_eq!(fired, vec![second]);
        assert!(!debounce.fire(first));
        assert!(debounce.fire(second));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_turning_loading_off_cancels() {
        let (clock, mut debounce) = scheduler();
        debounce.set_loading(true);
        debounce.request();
        assert!(debounce.set_loading(false));
        assert!(!debounce.is_pending());

        clock.advance(DEFAULT_DEBOUNCE);
        assert!(debounce.timers().process_expired().is_empty());
        assert!(!debounce.set_loading(false));
    }

    #[test]
    fn test_drop_cancels_pending_timer() {
        let (clock, mut debounce) = scheduler();
        let timers = debounce.timers().clone();
        debounce.set_loading(true);
        debounce.request();
        drop(debounce);

        assert_eq!(timers.active_count(), 0);
        clock.advance(DEFAULT_DEBOUNCE);
        assert!(timers.process_expired().is_empty());
    }

    #[test]
    fn test_custom_delay() {
        let (clock, mut debounce) = scheduler();
        debounce.set_delay(Duration::from_millis(50));
        debounce.set_loading(true);
        let Schedule::Deferred(id) = debounce.request() else {
            panic!("expected a deferred recompute");
        };
        clock.advance(Duration::from_millis(50));
        assert_eq!(debounce.timers().process_expired(), vec![id]);
    }
}
