//! Timer system for Horizon Select.
//!
//! Provides cancellable one-shot timers driven by a [`Clock`]. Timers do not
//! run callbacks themselves: the host event loop asks the manager which
//! timers have expired and routes each [`TimerId`] to its owner, which keeps
//! teardown ordering explicit (an owner that cancelled its timer simply never
//! sees the id again).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use horizon_select_core::{ManualClock, TimerManager};
//!
//! let clock = Arc::new(ManualClock::new());
//! let mut timers = TimerManager::with_clock(clock.clone());
//!
//! let id = timers.start_one_shot(Duration::from_millis(100));
//! assert!(timers.process_expired().is_empty());
//!
//! clock.advance(Duration::from_millis(100));
//! assert_eq!(timers.process_expired(), vec![id]);
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// Handle to a pending one-shot timer.
    pub struct TimerId;
}

// ============================================================================
// Clocks
// ============================================================================

/// A source of monotonic time for timers.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// The wall clock, backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Used to drive debounce timers deterministically in tests and in hosts
/// that run their own virtual time.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    /// Create a manual clock starting at the current instant.
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, duration: Duration) {
        *self.now.lock() += duration;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

// ============================================================================
// Timer Manager
// ============================================================================

#[derive(Debug)]
struct Pending {
    at: Instant,
}

/// Heap entry; ordered so the earliest deadline is on top.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    id: TimerId,
    at: Instant,
}

impl PartialEq for Deadline {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at
    }
}

impl Eq for Deadline {}

impl PartialOrd for Deadline {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Deadline {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: `BinaryHeap` pops the greatest element.
        other.at.cmp(&self.at)
    }
}

/// Manages one-shot timers.
pub struct TimerManager {
    /// Time source.
    clock: Arc<dyn Clock>,
    /// All pending timers. Cancelled and fired timers are removed.
    timers: SlotMap<TimerId, Pending>,
    /// Deadlines, earliest first. May hold entries for cancelled timers.
    queue: BinaryHeap<Deadline>,
}

impl TimerManager {
    /// Create a new timer manager on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a new timer manager on a custom clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// Get the clock this manager reads.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Schedule a timer `duration` from now.
    pub fn start_one_shot(&mut self, duration: Duration) -> TimerId {
        let at = self.clock.now() + duration;
        let id = self.timers.insert(Pending { at });
        self.queue.push(Deadline { id, at });

        tracing::trace!(target: targets::TIMER, ?id, ?duration, "timer started");
        id
    }

    /// Cancel a pending timer.
    ///
    /// Returns an error if the timer already fired or was never started here.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        if self.timers.remove(id).is_some() {
            tracing::trace!(target: targets::TIMER, ?id, "timer stopped");
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId.into())
        }
    }

    /// Check if a timer is still pending.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// How long until the earliest pending timer is due.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        // Drop cancelled timers from the front of the queue.
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }

        let now = self.clock.now();
        self.queue
            .peek()
            .map(|entry| entry.at.saturating_duration_since(now))
    }

    /// Remove and return every timer whose fire time has been reached.
    ///
    /// Ids are returned in fire-time order.
    #[tracing::instrument(skip(self), target = "horizon_select_core::timer", level = "trace")]
    pub fn process_expired(&mut self) -> Vec<TimerId> {
        let now = self.clock.now();
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.at > now {
                break;
            }
            self.queue.pop();

            // Cancelled timers leave their queue entry behind.
            let Some(timer) = self.timers.remove(entry.id) else {
                continue;
            };
            debug_assert_eq!(timer.at, entry.at);

            tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
            fired.push(entry.id);
        }

        fired
    }

    /// Get the number of pending timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerManager")
            .field("active", &self.timers.len())
            .finish()
    }
}

/// A thread-safe wrapper around [`TimerManager`].
///
/// Several widgets can share one of these behind an `Arc` so the host loop
/// has a single queue to sleep on.
#[derive(Debug, Default)]
pub struct SharedTimerManager {
    inner: Mutex<TimerManager>,
}

impl SharedTimerManager {
    /// Create a shared manager on the system clock.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TimerManager::new()),
        }
    }

    /// Create a shared manager on a custom clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(TimerManager::with_clock(clock)),
        }
    }

    pub fn start_one_shot(&self, duration: Duration) -> TimerId {
        self.inner.lock().start_one_shot(duration)
    }

    pub fn stop(&self, id: TimerId) -> Result<()> {
        self.inner.lock().stop(id)
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.inner.lock().is_active(id)
    }

    pub fn time_until_next(&self) -> Option<Duration> {
        self.inner.lock().time_until_next()
    }

    pub fn process_expired(&self) -> Vec<TimerId> {
        self.inner.lock().process_expired()
    }

    pub fn active_count(&self) -> usize {
        self.inner.lock().active_count()
    }
}

static_assertions::assert_impl_all!(SharedTimerManager: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn manual() -> (Arc<ManualClock>, TimerManager) {
        let clock = Arc::new(ManualClock::new());
        let timers = TimerManager::with_clock(clock.clone());
        (clock, timers)
    }

    #[test]
    fn test_one_shot_fires_once() {
        let (clock, mut timers) = manual();
        let id = timers.start_one_shot(Duration::from_millis(50));
        assert!(timers.is_active(id));

        clock.advance(Duration::from_millis(49));
        assert!(timers.process_expired().is_empty());

        clock.advance(Duration::from_millis(1));
        assert_eq!(timers.process_expired(), vec![id]);
        assert!(!timers.is_active(id));

        clock.advance(Duration::from_secs(10));
        assert!(timers.process_expired().is_empty());
    }

    #[test]
    fn test_stop_prevents_fire() {
        let (clock, mut timers) = manual();
        let id = timers.start_one_shot(Duration::from_millis(10));
        assert!(timers.stop(id).is_ok());
        assert_eq!(
            timers.stop(id),
            Err(crate::CoreError::Timer(TimerError::InvalidTimerId))
        );

        clock.advance(Duration::from_millis(20));
        assert!(timers.process_expired().is_empty());
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_fire_order() {
        let (clock, mut timers) = manual();
        let late = timers.start_one_shot(Duration::from_millis(30));
        let early = timers.start_one_shot(Duration::from_millis(10));

        clock.advance(Duration::from_millis(30));
        assert_eq!(timers.process_expired(), vec![early, late]);
    }

    #[test]
    fn test_time_until_next_skips_cancelled() {
        let (clock, mut timers) = manual();
        let first = timers.start_one_shot(Duration::from_millis(10));
        timers.start_one_shot(Duration::from_millis(40));
        timers.stop(first).unwrap();

        assert_eq!(timers.time_until_next(), Some(Duration::from_millis(40)));
        clock.advance(Duration::from_millis(100));
        assert_eq!(timers.time_until_next(), Some(Duration::ZERO));
    }

    #[test]
    fn test_no_timers() {
        let mut timers = TimerManager::new();
        assert_eq!(timers.time_until_next(), None);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_shared_manager() {
        let clock = Arc::new(ManualClock::new());
        let shared = Arc::new(SharedTimerManager::with_clock(clock.clone()));
        let id = shared.start_one_shot(Duration::from_millis(5));
        assert_eq!(shared.active_count(), 1);

        clock.advance(Duration::from_millis(5));
        assert_eq!(shared.process_expired(), vec![id]);
        assert!(!shared.is_active(id));
    }
}
