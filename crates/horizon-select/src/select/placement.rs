//! Floating panel placement.
//!
//! The widget never positions its panel itself. It hands the anchor bounds
//! and the viewport to a [`PlacementStrategy`] and applies the answer as-is.
//! Flip-to-fit and max-height clamping are the strategy's business.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Where and how large the option panel should be.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    /// Panel width; equal to the anchor width.
    pub width: f32,
    /// The tallest the panel may grow before scrolling.
    pub max_height: f32,
}

impl Placement {
    /// The panel rectangle at full max height.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.max_height)
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Computes a panel placement from anchor and viewport bounds.
pub trait PlacementStrategy: Send + Sync {
    fn compute_placement(&self, anchor: Rect, viewport: Rect) -> Placement;
}

impl<F> PlacementStrategy for F
where
    F: Fn(Rect, Rect) -> Placement + Send + Sync,
{
    fn compute_placement(&self, anchor: Rect, viewport: Rect) -> Placement {
        self(anchor, viewport)
    }
}

/// Default strategy: below the anchor, flipped above when there is more
/// room there, shifted horizontally to stay inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipPlacement {
    /// Gap between anchor and panel.
    pub offset: f32,
    /// Upper bound on the panel height.
    pub preferred_max_height: f32,
}

impl Default for FlipPlacement {
    fn default() -> Self {
        Self {
            offset: 4.0,
            preferred_max_height: 300.0,
        }
    }
}

impl PlacementStrategy for FlipPlacement {
    fn compute_placement(&self, anchor: Rect, viewport: Rect) -> Placement {
        let width = anchor.width();
        let space_below = (viewport.bottom() - anchor.bottom() - self.offset).max(0.0);
        let space_above = (anchor.top() - viewport.top() - self.offset).max(0.0);

        let (y, max_height) =
            if space_below >= self.preferred_max_height || space_below >= space_above {
                let max_height = self.preferred_max_height.min(space_below);
                (anchor.bottom() + self.offset, max_height)
            } else {
                // Flip to above
                let max_height = self.preferred_max_height.min(space_above);
                (anchor.top() - self.offset - max_height, max_height)
            };

        // Shift to stay within bounds
        let mut x = anchor.left();
        if x + width > viewport.right() {
            x = viewport.right() - width;
        }
        if x < viewport.left() {
            x = viewport.left();
        }

        Placement {
            x,
            y,
            width,
            max_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    #[test]
    fn test_places_below_with_anchor_width() {
        let anchor = Rect::new(100.0, 50.0, 200.0, 30.0);
        let placement = FlipPlacement::default().compute_placement(anchor, VIEWPORT);
        assert_eq!(placement.x, 100.0);
        assert_eq!(placement.y, 84.0);
        assert_eq!(placement.width, 200.0);
        assert_eq!(placement.max_height, 300.0);
    }

    #[test]
    fn test_flips_above_near_bottom() {
        let anchor = Rect::new(100.0, 540.0, 200.0, 30.0);
        let placement = FlipPlacement::default().compute_placement(anchor, VIEWPORT);
        assert_eq!(placement.max_height, 300.0);
        assert_eq!(placement.y, 540.0 - 4.0 - 300.0);
    }

    #[test]
    fn test_clamps_max_height_to_space() {
        let anchor = Rect::new(0.0, 0.0, 100.0, 30.0);
        let viewport = Rect::new(0.0, 0.0, 800.0, 134.0);
        let placement = FlipPlacement::default().compute_placement(anchor, viewport);
        assert_eq!(placement.max_height, 100.0);
    }

    #[test]
    fn test_shifts_into_viewport() {
        let anchor = Rect::new(700.0, 10.0, 200.0, 30.0);
        let placement = FlipPlacement::default().compute_placement(anchor, VIEWPORT);
        assert_eq!(placement.x, 600.0);
    }

    #[test]
    fn test_closure_strategy() {
        let strategy = |anchor: Rect, _viewport: Rect| Placement {
            x: anchor.left(),
            y: anchor.top(),
            width: anchor.width(),
            max_height: 42.0,
        };
        let placement = strategy.compute_placement(Rect::new(1.0, 2.0, 3.0, 4.0), VIEWPORT);
        assert_eq!(placement.rect(), Rect::new(1.0, 2.0, 3.0, 42.0));
        assert_eq!(placement.origin(), Point::new(1.0, 2.0));
    }
}
