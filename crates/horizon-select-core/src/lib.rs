//! Core systems for Horizon Select.
//!
//! This crate provides the event-loop primitives the selection widget is
//! built on:
//!
//! - **Signal/Slot System**: Type-safe notifications from widget to host
//! - **Timers**: Cancellable one-shot timers behind a pluggable [`Clock`]
//! - **Logging**: `tracing` targets and span names for filtering
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_select_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Timer Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use horizon_select_core::{ManualClock, SharedTimerManager};
//!
//! let clock = Arc::new(ManualClock::new());
//! let timers = SharedTimerManager::with_clock(clock.clone());
//!
//! let id = timers.start_one_shot(Duration::from_secs(1));
//! clock.advance(Duration::from_secs(1));
//! assert_eq!(timers.process_expired(), vec![id]);
//! ```

mod error;
pub mod logging;
pub mod signal;
mod timer;

pub use error::{CoreError, Result, TimerError};
pub use signal::{ConnectionId, Signal};
pub use timer::{Clock, ManualClock, SharedTimerManager, SystemClock, TimerId, TimerManager};
