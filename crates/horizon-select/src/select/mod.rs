//! The filterable select widget and its collaborators.
//!
//! [`SelectBox`] is the controller. The pieces it coordinates are usable on
//! their own:
//!
//! - [`OptionStore`]: option set plus filtered view
//! - [`DebounceScheduler`]: defers recomputes while the host is loading
//! - [`SelectionManager`]: single-replace and multi-toggle selection
//! - [`NavigationCursor`]: the active option, with wraparound

mod config;
mod cursor;
mod debounce;
mod events;
mod option;
mod placement;
mod render;
mod select_box;
mod selection;
mod store;

pub use config::{DEFAULT_ITEM_HEIGHT, DEFAULT_PAGE_SIZE, SelectConfig, SelectSettings};
pub use cursor::NavigationCursor;
pub use debounce::{DEFAULT_DEBOUNCE, DebounceScheduler, Schedule};
pub use events::{EscapeFocus, Key, SelectEvent};
pub use option::{
    OptionItem, SelectOption, canonical_json, display_string, options_equal, position_of,
};
pub use placement::{FlipPlacement, Placement, PlacementStrategy};
pub use render::{OptionView, RenderFn, render_label};
pub use select_box::{SelectBox, SelectPart};
pub use selection::{Selection, SelectionChange, SelectionManager, SelectionMode};
pub use store::{CaseSensitivity, FilterFn, FilterQuery, OptionStore, compute_filtered, filters};
