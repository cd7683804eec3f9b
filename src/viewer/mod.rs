//! Browser entry point: the `GridActually` struct exported to JavaScript.
//!
//! ```javascript
//! import init, { GridActually } from 'gridactually';
//! await init();
//! const grid = new GridActually({ useFlip: true });
//! document.querySelector('.gridactually')
//!   .addEventListener('GridActually:draw:complete', () => console.log('done'));
//! ```

mod console;
mod dom;

pub use dom::DomPlatform;

use log::LevelFilter;
use wasm_bindgen::prelude::*;

use crate::options::Options;
use crate::widget::GridWidget;

/// The widget exported to JavaScript.
///
/// Constructing it inserts the grid after the sprite image and draws as soon
/// as the sprite has loaded. Construct it once per page.
#[wasm_bindgen]
pub struct GridActually {
    widget: GridWidget<DomPlatform>,
}

#[wasm_bindgen]
impl GridActually {
    /// Create the widget.
    ///
    /// `options` may be `undefined` or an object with any of `allAtOnce`,
    /// `useFlip`, `debug`, `imageSelector`, `imageWidth`, `imageSize`, `boxSize`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<GridActually, JsValue> {
        console_error_panic_hook::set_once();
        let options = Options::from_js(options)?;
        console::init(if options.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        });
        let platform = DomPlatform::new(&options.image_selector)?;
        let widget = GridWidget::attach(platform, options)?;
        Ok(GridActually { widget })
    }

    /// Redraw after the debounce period, as a window resize does.
    pub fn redraw(&self) {
        self.widget.delayed_redraw();
    }

    /// Redraw immediately.
    pub fn draw(&self) -> Result<(), JsValue> {
        self.widget.draw().map_err(JsValue::from)
    }

    pub fn columns(&self) -> u32 {
        self.widget.layout().map_or(0, |l| l.columns)
    }

    pub fn rows(&self) -> u32 {
        self.widget.layout().map_or(0, |l| l.rows)
    }

    pub fn cells(&self) -> u32 {
        self.widget.layout().map_or(0, |l| l.cells)
    }

    #[wasm_bindgen(js_name = boxesDrawn)]
    pub fn boxes_drawn(&self) -> u32 {
        self.widget.boxes_drawn()
    }

    #[wasm_bindgen(js_name = imageTotal)]
    pub fn image_total(&self) -> u32 {
        self.widget.strip().image_total()
    }

    /// Whether the latest pass has fully settled.
    #[wasm_bindgen(js_name = isComplete)]
    pub fn is_complete(&self) -> bool {
        self.widget.phase() == crate::widget::Phase::Complete
    }
}
