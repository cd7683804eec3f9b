//! Grid geometry.
//!
//! This module handles:
//! - Viewport dimensions as reported by the platform
//! - Sizing the grid so whole boxes cover the viewport

mod grid_layout;
mod viewport;

pub use grid_layout::GridLayout;
pub use viewport::Viewport;
