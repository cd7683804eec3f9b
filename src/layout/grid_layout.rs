//! Grid dimensions for a viewport.

use super::Viewport;
use crate::error::{GridError, Result};

/// Columns, rows and cell count of one draw pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Number of box columns (at least 1)
    pub columns: u32,
    /// Number of box rows (at least 1)
    pub rows: u32,
    /// Cells to draw: `columns * rows + 1`
    pub cells: u32,
    /// Edge length of one box in pixels
    pub box_size: u32,
}

impl GridLayout {
    /// Compute the smallest whole-box grid covering `viewport`.
    ///
    /// One cell beyond `columns * rows` is always drawn so a fractional
    /// overflow never leaves a gap.
    pub fn compute(viewport: Viewport, box_size: u32) -> Result<Self> {
        if box_size == 0 {
            return Err(GridError::InvalidStrip {
                image_width: 0,
                image_size: 0,
                box_size,
            });
        }
        let columns = viewport.width.div_ceil(box_size).max(1);
        let rows = viewport.height.div_ceil(box_size).max(1);
        let cells = columns.saturating_mul(rows).saturating_add(1);
        Ok(Self {
            columns,
            rows,
            cells,
            box_size,
        })
    }

    /// Grid width in pixels.
    pub fn width_px(&self) -> u32 {
        self.columns.saturating_mul(self.box_size)
    }

    /// Grid height in pixels.
    pub fn height_px(&self) -> u32 {
        self.rows.saturating_mul(self.box_size)
    }
}
