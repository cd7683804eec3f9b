//! The sprite strip: one wide image holding every tile side by side.

use crate::error::Result;
use crate::options::Options;

/// Sprite URL plus the metrics needed to crop a tile out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteStrip {
    url: String,
    image_total: u32,
    box_size: u32,
}

impl SpriteStrip {
    /// Build the strip for `url` using the metrics in `options`.
    ///
    /// # Errors
    /// Returns `GridError::InvalidStrip` for zero sizes or a strip narrower
    /// than one image.
    pub fn new(url: impl Into<String>, options: &Options) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            url: url.into(),
            image_total: options.image_width / options.image_size,
            box_size: options.box_size,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of distinct images in the strip.
    pub fn image_total(&self) -> u32 {
        self.image_total
    }

    pub fn box_size(&self) -> u32 {
        self.box_size
    }

    /// Map a cell to an image, wrapping around when the grid has more cells
    /// than the strip has images.
    pub fn resolve_image_index(&self, cell: u32) -> u32 {
        if cell < self.image_total {
            cell
        } else {
            cell % self.image_total.max(1)
        }
    }

    /// CSS `background-position` that shows image `image_index` in a box.
    ///
    /// Written as a two-value shorthand since some engines ignore the
    /// per-axis properties.
    pub fn background_position(&self, image_index: u32) -> String {
        let offset = u64::from(self.box_size) * u64::from(image_index);
        if offset == 0 {
            "0px 0".to_string()
        } else {
            format!("-{offset}px 0")
        }
    }
}
