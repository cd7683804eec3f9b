//! Structured error types for gridactually.

/// All errors that can occur while building or animating the grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A required DOM node (window, document, source image, parent) is absent.
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// The source element carries no sprite URL.
    #[error("Missing sprite source on {0}")]
    MissingSource(String),

    /// The options object did not match the expected shape.
    #[error("Invalid options: {0}")]
    Options(String),

    /// Strip metrics that would make the grid or index mapping degenerate.
    #[error("Invalid sprite strip: width {image_width}px, image {image_size}px, box {box_size}px")]
    InvalidStrip {
        image_width: u32,
        image_size: u32,
        box_size: u32,
    },

    /// A DOM call threw.
    #[error("DOM error: {0}")]
    Dom(String),

    /// A timer could not be scheduled.
    #[error("Timer error: {0}")]
    Timer(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl GridError {
    /// Wrap a thrown `JsValue` as a DOM error.
    pub(crate) fn dom(value: &wasm_bindgen::JsValue) -> Self {
        Self::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
