//! Instance options and the fixed timing/class-name constants of the widget.

use serde::Deserialize;

use crate::error::{GridError, Result};

/// Per-cell stagger between insertions (ms).
pub const STAGGER_INTERVAL_MS: u32 = 5;
/// Time a tile stays flipped after insertion before it settles (ms).
pub const SETTLE_DELAY_MS: u32 = 700;
/// Quiet period after the last resize before redrawing (ms).
pub const REDRAW_DEBOUNCE_MS: u32 = 300;

/// Default sprite strip width in pixels.
pub const DEFAULT_IMAGE_WIDTH: u32 = 5400;
/// Default width of one image in the strip, in pixels.
pub const DEFAULT_IMAGE_SIZE: u32 = 200;
/// Default rendered cell size, in pixels.
pub const DEFAULT_BOX_SIZE: u32 = 80;
/// Default selector for the sprite `<img>`.
pub const DEFAULT_IMAGE_SELECTOR: &str = ".gridactually-image";

/// CSS class names the widget puts on the elements it creates.
pub mod class {
    pub const CONTAINER: &str = "gridactually-container";
    pub const GRID: &str = "gridactually";
    pub const OVERLAY: &str = "gridactually-overlay";
    pub const BOX: &str = "box";
    pub const IMAGES: &str = "images";
    pub const FRONT: &str = "front";
    pub const BACK: &str = "back";
    pub const FLIPPED: &str = "flipped";
}

/// Construction options, deserialized from a JS object with camelCase keys.
///
/// Every field is optional; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Options {
    /// Show every tile immediately instead of cascading.
    pub all_at_once: bool,
    /// Flip tiles from their back face when they settle.
    pub use_flip: bool,
    /// Log layout and per-cell records.
    pub debug: bool,
    /// Selector of the source `<img>` holding the sprite strip.
    pub image_selector: String,
    /// Total strip width in pixels.
    pub image_width: u32,
    /// Width of one image in the strip.
    pub image_size: u32,
    /// Rendered cell size.
    pub box_size: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            all_at_once: false,
            use_flip: true,
            debug: false,
            image_selector: DEFAULT_IMAGE_SELECTOR.to_string(),
            image_width: DEFAULT_IMAGE_WIDTH,
            image_size: DEFAULT_IMAGE_SIZE,
            box_size: DEFAULT_BOX_SIZE,
        }
    }
}

impl Options {
    /// Delay before the tile of `cell` is inserted.
    pub fn stagger_delay_ms(&self, cell: u32) -> u32 {
        if self.all_at_once {
            0
        } else {
            cell.saturating_mul(STAGGER_INTERVAL_MS)
        }
    }

    /// Delay between a tile's insertion and its settle step.
    pub fn settle_delay_ms(&self) -> u32 {
        if self.all_at_once {
            0
        } else {
            SETTLE_DELAY_MS
        }
    }

    /// Reject strip metrics that would divide by zero or yield no images.
    pub fn validate(&self) -> Result<()> {
        if self.box_size == 0 || self.image_size == 0 || self.image_width < self.image_size {
            return Err(GridError::InvalidStrip {
                image_width: self.image_width,
                image_size: self.image_size,
                box_size: self.box_size,
            });
        }
        Ok(())
    }

    /// Read options from a JS value; `undefined` and `null` mean defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn from_js(value: wasm_bindgen::JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let options: Self =
            serde_wasm_bindgen::from_value(value).map_err(|e| GridError::Options(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }
}
