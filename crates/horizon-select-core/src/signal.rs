//! Change notification from widget to host.
//!
//! A [`Signal`] holds any number of host callbacks ("slots"). The widget
//! emits it whenever the matching piece of state changes: a proposed
//! selection, an edited query, the panel opening or closing.
//!
//! Slots run synchronously on the emitting thread, in the order they were
//! connected, before `emit` returns.
//!
//! # Example
//!
//! ```
//! use horizon_select_core::Signal;
//!
//! let query_edited = Signal::<String>::new();
//!
//! let id = query_edited.connect(|query| {
//!     println!("query is now {query:?}");
//! });
//!
//! query_edited.emit("ban".to_string());
//! assert!(query_edited.disconnect(id));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// Handle returned by [`Signal::connect`], used to remove that slot again.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A list of callbacks invoked with `&Args` on every emission.
///
/// Use `Signal<()>` for notifications that carry no payload.
pub struct Signal<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    blocked: AtomicBool,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// A signal with nothing connected.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Register a callback.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.slots.lock().insert(Arc::new(slot));
        tracing::trace!(target: targets::SIGNAL, ?id, "slot connected");
        id
    }

    /// Remove one callback. Returns `false` for an unknown or already removed id.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// Remove every callback.
    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    /// Number of registered callbacks.
    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Suppress emissions until unblocked.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::Release);
    }

    /// Whether emissions are suppressed.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Acquire)
    }

    /// Invoke every callback with `args`.
    ///
    /// Callbacks are collected before the first one runs, so a callback may
    /// connect to or disconnect from this same signal. Changes take effect
    /// on the next emission.
    #[tracing::instrument(skip_all, target = "horizon_select_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "emission suppressed");
            return;
        }

        let slots: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emitting");

        for slot in &slots {
            slot(&args);
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.lock().len())
            .field("blocked", &self.blocked.load(Ordering::Acquire))
            .finish()
    }
}

static_assertions::assert_impl_all!(Signal<String>: Send, Sync);
