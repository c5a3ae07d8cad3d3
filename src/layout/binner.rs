//! Successive square bins tiled across a rectangle
//!
//! Bins are handed out left-to-right along the bottom row, then one row up
//! when a row is full, until the rectangle's rows are exhausted. Whatever
//! lies above the consumed rows is reported as the left-over rectangle.

use super::Rect;

/// Yields successive square bin rectangles inside a larger rectangle
#[derive(Debug, Clone)]
pub struct RectangleBinner {
    rect: Rect,
    bin_length: f64,
    /// Bins per row
    columns: usize,
    /// Rows available
    rows: usize,
    /// Next bin number, counted from the bottom-left
    next_index: usize,
}

impl RectangleBinner {
    pub fn new(rect: Rect, bin_length: f64) -> Self {
        let (columns, rows) = if bin_length > 0.0 {
            (
                (rect.width / bin_length).floor() as usize,
                (rect.height / bin_length).floor() as usize,
            )
        } else {
            (0, 0)
        };

        RectangleBinner {
            rect,
            bin_length,
            columns,
            rows,
            next_index: 0,
        }
    }

    /// The next bin, or `None` when bin space is exhausted
    pub fn next_bin(&mut self) -> Option<Rect> {
        if self.columns == 0 || self.next_index >= self.columns * self.rows {
            return None;
        }

        let row = self.next_index / self.columns;
        let column = self.next_index % self.columns;
        self.next_index += 1;

        Some(Rect::new(
            self.rect.left + column as f64 * self.bin_length,
            self.rect.bottom() - (row + 1) as f64 * self.bin_length,
            self.bin_length,
            self.bin_length,
        ))
    }

    /// Number of bins handed out so far
    pub fn bins_used(&self) -> usize {
        self.next_index
    }

    /// The portion of the rectangle above the consumed rows
    ///
    /// A partially filled row counts as consumed. `None` when nothing
    /// usable is left.
    pub fn remaining_rect(&self) -> Option<Rect> {
        let used_rows = if self.columns == 0 {
            0
        } else {
            self.next_index.div_ceil(self.columns)
        };

        let remaining_height = self.rect.height - used_rows as f64 * self.bin_length;
        if remaining_height <= 0.0 {
            return None;
        }

        Some(Rect::new(
            self.rect.left,
            self.rect.top,
            self.rect.width,
            remaining_height,
        ))
    }
}
