//! Horizon Select - a headless, filterable select box.
//!
//! The crate implements the interaction core of a combobox: a text input
//! that reveals a filtered list of options, keyboard navigation with
//! wraparound, debounced filtering while the host is loading, and single or
//! multiple selection with structural option equality. Drawing is left to
//! the host, which reads [`SelectBox::option_views`] and
//! [`SelectBox::panel_placement`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use horizon_select::prelude::*;
//!
//! let mut select = SelectBox::new(
//!     SelectConfig::new(vec!["apple", "banana", "orange"])
//!         .with_multiple(true)
//!         .with_filter(filters::contains(CaseSensitivity::CaseInsensitive)),
//! )
//! .unwrap();
//!
//! let picked = Arc::new(Mutex::new(Vec::new()));
//! let sink = picked.clone();
//! select.changed.connect(move |value| {
//!     sink.lock().push(value.as_slice().to_vec());
//! });
//!
//! select.handle_event(SelectEvent::InputChanged("ban".into())).unwrap();
//! select.handle_event(SelectEvent::OptionClicked(0)).unwrap();
//! assert_eq!(*picked.lock(), vec![vec!["banana"]]);
//! ```
//!
//! # Timers
//!
//! While loading, recomputes wait on a one-shot timer. The host loop
//! either calls [`SelectBox::poll_timers`] or drains a shared
//! [`SharedTimerManager`](horizon_select_core::SharedTimerManager) itself
//! and hands each id to [`SelectBox::handle_timer`].

pub mod error;
pub mod geometry;
pub mod prelude;
pub mod select;

pub use error::{FilterError, SelectError, SelectResult};
pub use geometry::{Point, Rect};
pub use select::*;
