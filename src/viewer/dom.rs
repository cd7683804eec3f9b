//! `Platform` implementation over the browser DOM.
//!
//! Builds the container/grid/overlay elements next to the sprite `<img>` and
//! maps timers and events onto `window`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventInit, EventTarget, HtmlDivElement,
    HtmlImageElement, Node, Window,
};

use crate::error::{GridError, Result};
use crate::layout::Viewport;
use crate::options::class;
use crate::platform::{GridEvent, Platform, Task, TimerHandle};
use crate::tile::TileSpec;

/// A registered DOM listener, kept alive until the platform is dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// Timer callbacks, owned here until they fire or are cleared.
#[derive(Default)]
struct Timers {
    live: HashMap<i32, Closure<dyn FnMut()>>,
    /// Fired timers whose closures can be dropped on the next reap.
    spent: Vec<i32>,
    /// Timer whose callback is on the stack right now.
    firing: Option<i32>,
}

impl Timers {
    fn reap(&mut self) {
        for id in self.spent.drain(..) {
            self.live.remove(&id);
        }
    }
}

/// The widget's elements plus the window they live in.
pub struct DomPlatform {
    window: Window,
    document: Document,
    source: Element,
    container: HtmlDivElement,
    grid: HtmlDivElement,
    overlay: HtmlDivElement,
    listeners: RefCell<Vec<Listener>>,
    timers: Rc<RefCell<Timers>>,
}

impl DomPlatform {
    /// Find the sprite element matching `selector` and insert the widget's
    /// elements right after it.
    ///
    /// # Errors
    /// Returns `GridError::MissingElement` if there is no window, document or
    /// matching element.
    pub fn new(selector: &str) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| GridError::MissingElement("window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| GridError::MissingElement("document".into()))?;
        let source = document
            .query_selector(selector)
            .map_err(|e| GridError::dom(&e))?
            .ok_or_else(|| GridError::MissingElement(selector.to_string()))?;

        let container = create_div(&document, class::CONTAINER)?;
        let grid = create_div(&document, class::GRID)?;
        let overlay = create_div(&document, class::OVERLAY)?;

        source
            .after_with_node_1(&container)
            .map_err(|e| GridError::dom(&e))?;
        container
            .append_child(&grid)
            .map_err(|e| GridError::dom(&e))?;
        container
            .after_with_node_1(&overlay)
            .map_err(|e| GridError::dom(&e))?;

        Ok(Self {
            window,
            document,
            source,
            container,
            grid,
            overlay,
            listeners: RefCell::new(Vec::new()),
            timers: Rc::new(RefCell::new(Timers::default())),
        })
    }

    /// The element lifecycle events are dispatched on.
    pub fn grid(&self) -> &HtmlDivElement {
        &self.grid
    }

    pub fn container(&self) -> &HtmlDivElement {
        &self.container
    }

    pub fn overlay(&self) -> &HtmlDivElement {
        &self.overlay
    }

    /// Timer callbacks still held: scheduled and not yet fired or cleared.
    pub fn live_timers(&self) -> usize {
        let mut timers = self.timers.borrow_mut();
        timers.reap();
        timers.live.len()
    }

    fn listen(
        &self,
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(Event)>,
        once: bool,
    ) -> Result<()> {
        let options = AddEventListenerOptions::new();
        options.set_once(once);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| GridError::dom(&e))?;
        self.listeners.borrow_mut().push(Listener {
            target,
            kind,
            closure,
        });
        Ok(())
    }

    fn sprite_loaded(&self) -> bool {
        self.source
            .dyn_ref::<HtmlImageElement>()
            .is_some_and(|img| img.complete() && img.natural_width() > 0)
    }
}

impl Drop for DomPlatform {
    fn drop(&mut self) {
        for listener in self.listeners.get_mut().drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
        let mut timers = self.timers.borrow_mut();
        // Freeing a closure while it runs is undefined; the last widget
        // reference can go away inside a timer task.
        let firing = timers.firing;
        if let Some(closure) = firing.and_then(|id| timers.live.remove(&id)) {
            closure.forget();
        }
        for (id, _) in timers.live.drain() {
            self.window.clear_timeout_with_handle(id);
        }
        timers.spent.clear();
    }
}

fn create_div(document: &Document, class_name: &str) -> Result<HtmlDivElement> {
    let div = document
        .create_element("div")
        .map_err(|e| GridError::dom(&e))?
        .dyn_into::<HtmlDivElement>()
        .map_err(|_| GridError::Dom("created element is not a div".into()))?;
    div.set_class_name(class_name);
    Ok(div)
}

fn px(value: u32) -> String {
    format!("{value}px")
}

fn set_size(element: &HtmlDivElement, size: &str) -> Result<()> {
    let style = element.style();
    style
        .set_property("width", size)
        .map_err(|e| GridError::dom(&e))?;
    style
        .set_property("height", size)
        .map_err(|e| GridError::dom(&e))
}

impl Platform for DomPlatform {
    type Tile = HtmlDivElement;

    fn source_url(&self) -> Option<String> {
        self.source.get_attribute("src").filter(|src| !src.is_empty())
    }

    fn viewport(&self) -> Viewport {
        self.document
            .document_element()
            .map(|root| Viewport::from_client(root.client_width(), root.client_height()))
            .unwrap_or_default()
    }

    fn set_grid_size(&self, width_px: u32, height_px: u32) {
        let style = self.grid.style();
        let _ = style.set_property("width", &px(width_px));
        let _ = style.set_property("height", &px(height_px));
    }

    fn set_overlay_height(&self, height_px: u32) {
        let _ = self.overlay.style().set_property("height", &px(height_px));
    }

    fn build_tile(&self, spec: &TileSpec) -> Result<HtmlDivElement> {
        let tile = create_div(&self.document, class::BOX)?;
        let images = create_div(&self.document, class::IMAGES)?;
        let front = create_div(&self.document, class::FRONT)?;
        let back = create_div(&self.document, class::BACK)?;

        let front_style = front.style();
        front_style
            .set_property("background-image", &format!("url({})", spec.image_url))
            .map_err(|e| GridError::dom(&e))?;
        front_style
            .set_property("background-position", &spec.background_position)
            .map_err(|e| GridError::dom(&e))?;

        if spec.flipped {
            tile.class_list()
                .add_1(class::FLIPPED)
                .map_err(|e| GridError::dom(&e))?;
        }

        let size = px(spec.size_px);
        for element in [&tile, &front, &back] {
            set_size(element, &size)?;
        }

        images.append_child(&front).map_err(|e| GridError::dom(&e))?;
        images.append_child(&back).map_err(|e| GridError::dom(&e))?;
        tile.append_child(&images).map_err(|e| GridError::dom(&e))?;
        Ok(tile)
    }

    fn replace_tile(&self, old: &HtmlDivElement, tile: &HtmlDivElement) -> Result<()> {
        old.replace_with_with_node_1(tile)
            .map_err(|e| GridError::dom(&e))
    }

    fn insert_tile(&self, tile: &HtmlDivElement, before: Option<&HtmlDivElement>) -> Result<()> {
        let before: Option<&Node> = before.map(AsRef::as_ref);
        self.grid
            .insert_before(tile, before)
            .map(|_| ())
            .map_err(|e| GridError::dom(&e))
    }

    fn remove_tile(&self, tile: &HtmlDivElement) {
        tile.remove();
    }

    fn hide_tile(&self, tile: &HtmlDivElement) {
        let _ = tile.style().set_property("display", "none");
    }

    fn unflip_tile(&self, tile: &HtmlDivElement) {
        let _ = tile.class_list().remove_1(class::FLIPPED);
    }

    fn set_timeout(&self, delay_ms: u32, task: Task) -> Result<TimerHandle> {
        self.timers.borrow_mut().reap();

        let id = Rc::new(Cell::new(None::<i32>));
        let own_id = Rc::clone(&id);
        let timers = Rc::downgrade(&self.timers);
        let mut task = Some(task);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(timers) = timers.upgrade() {
                timers.borrow_mut().firing = own_id.get();
            }
            if let Some(task) = task.take() {
                task();
            }
            if let (Some(timers), Some(id)) = (timers.upgrade(), own_id.get()) {
                let mut timers = timers.borrow_mut();
                timers.firing = None;
                timers.spent.push(id);
            }
        }) as Box<dyn FnMut()>);

        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                i32::try_from(delay_ms).unwrap_or(i32::MAX),
            )
            .map_err(|e: JsValue| GridError::Timer(format!("{e:?}")))?;
        id.set(Some(handle));
        self.timers.borrow_mut().live.insert(handle, closure);
        Ok(TimerHandle(handle))
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.window.clear_timeout_with_handle(handle.0);
        let mut timers = self.timers.borrow_mut();
        timers.reap();
        if timers.firing != Some(handle.0) {
            timers.live.remove(&handle.0);
        }
    }

    fn emit(&self, event: GridEvent) {
        let init = EventInit::new();
        init.set_bubbles(true);
        match Event::new_with_event_init_dict(&event.event_type(), &init) {
            Ok(dom_event) => {
                let _ = self.grid.dispatch_event(&dom_event);
            }
            Err(e) => log::warn!("could not create {} event: {e:?}", event.short_name()),
        }
    }

    fn on_source_ready(&self, task: Task) -> Result<()> {
        if self.sprite_loaded() {
            task();
            return Ok(());
        }
        let closure: Closure<dyn FnMut(Event)> = Closure::once(move |_event: Event| task());
        self.listen(self.source.clone().into(), "load", closure, true)
    }

    fn on_resize(&self, mut handler: Box<dyn FnMut()>) -> Result<()> {
        let closure = Closure::wrap(Box::new(move |_event: Event| handler()) as Box<dyn FnMut(Event)>);
        self.listen(self.window.clone().into(), "resize", closure, false)
    }
}
