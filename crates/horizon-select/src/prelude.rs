//! Prelude module for Horizon Select.
//!
//! ```
//! use horizon_select::prelude::*;
//! ```

// ============================================================================
// Widget
// ============================================================================

pub use crate::select::{
    EscapeFocus, Key, OptionItem, OptionView, SelectBox, SelectConfig, SelectEvent, SelectOption,
    SelectSettings, Selection, SelectionMode,
};

// ============================================================================
// Filtering and Placement
// ============================================================================

pub use crate::select::{
    CaseSensitivity, FilterFn, FilterQuery, FlipPlacement, Placement, PlacementStrategy, filters,
};

// ============================================================================
// Errors and Geometry
// ============================================================================

pub use crate::error::{FilterError, SelectError, SelectResult};
pub use crate::geometry::{Point, Rect};

// ============================================================================
// Core
// ============================================================================

pub use horizon_select_core::{ManualClock, SharedTimerManager, Signal, TimerId};
