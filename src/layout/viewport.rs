//! Viewport dimensions.

/// Visible area the grid must cover, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Build a viewport from DOM measurements, clamping negatives to zero.
    pub fn from_client(width: i32, height: i32) -> Self {
        Self {
            width: u32::try_from(width).unwrap_or(0),
            height: u32::try_from(height).unwrap_or(0),
        }
    }
}
