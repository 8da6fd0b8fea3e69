//! Navigation cursor: which option of the filtered view is active.
//!
//! The active option is the one highlighted for keyboard action. It is
//! independent of the selection and always either `None` or a valid index
//! into the current filtered view.

/// Tracks the active index into the filtered view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationCursor {
    active: Option<usize>,
}

impl NavigationCursor {
    /// Create a cursor with no active option.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active index, if any.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Clear the active index.
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Anchor to the first option when the panel opens.
    pub fn on_open(&mut self, len: usize) {
        self.active = if len > 0 { Some(0) } else { None };
    }

    /// Move forward one option, wrapping from the last to the first.
    pub fn move_down(&mut self, len: usize) {
        self.active = match (len, self.active) {
            (0, _) => None,
            (_, Some(i)) if i + 1 < len => Some(i + 1),
            _ => Some(0),
        };
    }

    /// Move back one option, wrapping from the first (or none) to the last.
    pub fn move_up(&mut self, len: usize) {
        self.active = match (len, self.active) {
            (0, _) => None,
            (_, Some(i)) if i > 0 && i < len => Some(i - 1),
            _ => Some(len - 1),
        };
    }

    /// Jump to the first option.
    pub fn move_first(&mut self, len: usize) {
        self.on_open(len);
    }

    /// Jump to the last option.
    pub fn move_last(&mut self, len: usize) {
        self.active = len.checked_sub(1);
    }

    /// Move forward by a page, stopping at the last option.
    pub fn page_down(&mut self, len: usize, page: usize) {
        if len == 0 {
            self.active = None;
            return;
        }
        let target = self.active.map_or(0, |i| i.saturating_add(page.max(1)));
        self.active = Some(target.min(len - 1));
    }

    /// Move back by a page, stopping at the first option.
    pub fn page_up(&mut self, len: usize, page: usize) {
        if len == 0 {
            self.active = None;
            return;
        }
        let current = self.active.unwrap_or(0).min(len - 1);
        self.active = Some(current.saturating_sub(page.max(1)));
    }

    /// Point at a specific option, e.g. under the mouse.
    ///
    /// Out-of-range indices are ignored and return `false`.
    pub fn set(&mut self, index: usize, len: usize) -> bool {
        if index < len {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    /// Revalidate after the filtered view changed.
    ///
    /// An index that no longer fits is cleared, not clamped, so the cursor
    /// never lands on an unrelated option.
    pub fn on_filtered_view_changed(&mut self, len: usize) {
        if self.active.is_some_and(|i| i >= len) {
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_open() {
        let mut cursor = NavigationCursor::new();
        cursor.on_open(3);
        assert_eq!(cursor.active(), Some(0));
        cursor.on_open(0);
        assert_eq!(cursor.active(), None);
    }

    #[test]
    fn test_wraparound() {
        for len in 1..6 {
            let mut cursor = NavigationCursor::new();
            cursor.move_last(len);
            assert_eq!(cursor.active(), Some(len - 1));
            cursor.move_down(len);
            assert_eq!(cursor.active(), Some(0));
            cursor.move_up(len);
            assert_eq!(cursor.active(), Some(len - 1));
        }
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        let mut cursor = NavigationCursor::new();
        cursor.on_open(4);
        for _ in 0..4 {
            cursor.move_down(4);
        }
        assert_eq!(cursor.active(), Some(0));
        for _ in 0..4 {
            cursor.move_up(4);
        }
        assert_eq!(cursor.active(), Some(0));
    }

    #[test]
    fn test_moves_from_none() {
        let mut cursor = NavigationCursor::new();
        cursor.move_down(3);
        assert_eq!(cursor.active(), Some(0));

        cursor.clear();
        cursor.move_up(3);
        assert_eq!(cursor.active(), Some(2));
    }

    #[test]
    fn test_empty_view_stays_none() {
        let mut cursor = NavigationCursor::new();
        cursor.move_down(0);
        cursor.move_up(0);
        cursor.page_down(0, 10);
        cursor.page_up(0, 10);
        cursor.move_last(0);
        assert_eq!(cursor.active(), None);
    }

    #[test]
    fn test_clamp_clears_out_of_bounds() {
        let mut cursor = NavigationCursor::new();
        assert!(cursor.set(2, 5));
        cursor.on_filtered_view_changed(2);
        assert_eq!(cursor.active(), None);

        assert!(cursor.set(1, 5));
        cursor.on_filtered_view_changed(2);
        assert_eq!(cursor.active(), Some(1));
    }

    #[test]
    fn test_paging_clamps() {
        let mut cursor = NavigationCursor::new();
        cursor.on_open(25);
        cursor.page_down(25, 10);
        assert_eq!(cursor.active(), Some(10));
        cursor.page_down(25, 10);
        cursor.page_down(25, 10);
        assert_eq!(cursor.active(), Some(24));
        cursor.page_up(25, 10);
        assert_eq!(cursor.active(), Some(14));
        cursor.page_up(25, 100);
        assert_eq!(cursor.active(), Some(0));
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut cursor = NavigationCursor::new();
        assert!(!cursor.set(3, 3));
        assert_eq!(cursor.active(), None);
    }
}
