//! gridactually - animated sprite grid for the web
//!
//! Slices a wide sprite image into tiles and fills the viewport with them via
//! WebAssembly and the DOM:
//! - Grid sized to cover the viewport with whole boxes
//! - Cells wrap around the strip when there are more cells than images
//! - Staggered, optionally flipped reveal
//! - Debounced redraw on window resize
//! - `GridActually:draw:start` / `GridActually:draw:complete` events
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridActually } from 'gridactually';
//! await init();
//! const grid = new GridActually({ allAtOnce: false, useFlip: true });
//! ```
//!
//! The core (`layout`, `sprite`, `widget`) is host-independent and runs
//! against any [`platform::Platform`]; the browser binding lives in `viewer`.

pub mod error;
pub mod layout;
pub mod options;
pub mod platform;
pub mod sprite;
pub mod tile;
pub mod widget;

// Browser binding (DOM + timers)
#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use layout::{GridLayout, Viewport};
pub use options::Options;
pub use platform::{GridEvent, Platform, TimerHandle};
pub use sprite::SpriteStrip;
pub use widget::{GridWidget, PassId, Phase};

#[cfg(target_arch = "wasm32")]
pub use viewer::GridActually;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
