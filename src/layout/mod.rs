//! Force-directed layout
//!
//! Assigns 2-D coordinates to vertices inside a bounded rectangle: small
//! components are segregated into grid bins first, the rest goes through an
//! iterative Fruchterman-Reingold pass. Coordinates use screen conventions
//! (y grows downward).

mod binner;
mod force;
mod snapshot;

pub use binner::RectangleBinner;
pub use force::{ForceDirectedLayout, LayoutConfig, LayoutOutcome};
pub use snapshot::{snap_to_grid, LayoutSnapshot};

use serde::{Deserialize, Serialize};

/// An axis-aligned layout rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> crate::graph::Location {
        crate::graph::Location::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn contains(&self, location: crate::graph::Location) -> bool {
        location.x >= self.left
            && location.x <= self.right()
            && location.y >= self.top
            && location.y <= self.bottom()
    }

    /// Shrink on all four sides, clamping to non-negative dimensions
    pub fn inset(&self, margin: f64) -> Rect {
        let margin_x = margin.min(self.width / 2.0).max(0.0);
        let margin_y = margin.min(self.height / 2.0).max(0.0);
        Rect {
            left: self.left + margin_x,
            top: self.top + margin_y,
            width: (self.width - 2.0 * margin_x).max(0.0),
            height: (self.height - 2.0 * margin_y).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Location;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert_eq!(rect.center(), Location::new(60.0, 45.0));
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Location::new(5.0, 5.0)));
        assert!(rect.contains(Location::new(0.0, 10.0)));
        assert!(!rect.contains(Location::new(-1.0, 5.0)));
        assert!(!rect.contains(Location::new(5.0, 11.0)));
    }

    #[test]
    fn test_rect_inset() {
        let rect = Rect::new(0.0, 0.0, 100.0, 40.0);
        let inner = rect.inset(6.0);
        assert_eq!(inner, Rect::new(6.0, 6.0, 88.0, 28.0));

        // Margin larger than the rectangle collapses to the center
        let tiny = Rect::new(0.0, 0.0, 4.0, 4.0).inset(10.0);
        assert_eq!(tiny.width, 0.0);
        assert_eq!(tiny.height, 0.0);
    }
}
