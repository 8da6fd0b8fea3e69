//! Input events delivered to a [`SelectBox`](super::SelectBox).

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Keys the select widget reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Move the active option down, wrapping to the first.
    ArrowDown,
    /// Move the active option up, wrapping to the last.
    ArrowUp,
    /// Jump to the first option.
    Home,
    /// Jump to the last option.
    End,
    /// Move down one page, stopping at the last option.
    PageDown,
    /// Move up one page, stopping at the first option.
    PageUp,
    /// Select the active option.
    Enter,
    /// Close the panel.
    Escape,
    /// Delete the grapheme before the end of the query.
    Backspace,
    /// A printable character typed into the input.
    Character(char),
}

/// An interaction event.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectEvent {
    /// Pointer pressed on the input.
    PointerDownInput,
    /// Pointer pressed at a position; hit-tested against the anchor and
    /// panel geometry.
    PointerDown(Point),
    /// The input text was replaced by the host's text field.
    InputChanged(String),
    /// Pointer clicked the option at this index of the filtered view.
    OptionClicked(usize),
    /// Pointer moved over the option at this index of the filtered view.
    OptionHovered(usize),
    /// Mouse wheel over the panel, in rows. Negative scrolls up.
    Scroll(i32),
    /// A key was pressed while the input had focus.
    KeyPress(Key),
    /// Pointer pressed somewhere outside the component.
    ClickOutside,
}

impl From<Key> for SelectEvent {
    fn from(key: Key) -> Self {
        Self::KeyPress(key)
    }
}

/// What happens to input focus when Escape closes the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeFocus {
    /// The input keeps focus.
    #[default]
    Keep,
    /// The input gives up focus.
    Release,
}
