//! Common test utilities: an in-memory `Platform` with a manual clock.
//!
//! `FakePlatform` records every element operation and lifecycle event so
//! tests can drive a `GridWidget` deterministically with `advance`.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use gridactually::error::{GridError, Result};
use gridactually::layout::Viewport;
use gridactually::platform::{GridEvent, Platform, Task, TimerHandle};
use gridactually::tile::TileSpec;
use gridactually::{GridWidget, Options};

/// Handle to a fake tile element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FakeTile(pub u32);

/// What the fake knows about one built tile.
#[derive(Debug, Clone)]
pub struct TileState {
    pub spec: TileSpec,
    pub flipped: bool,
    pub hidden: bool,
    pub removed: bool,
}

struct Timer {
    due: u64,
    seq: u64,
    handle: i32,
    task: Task,
}

#[derive(Default)]
struct Clock {
    now: u64,
    seq: u64,
    next_handle: i32,
    queue: Vec<Timer>,
}

/// Deterministic single-threaded host.
pub struct FakePlatform {
    url: Option<String>,
    loaded: bool,
    viewport: Cell<Viewport>,
    clock: RefCell<Clock>,
    grid_size: Cell<(u32, u32)>,
    overlay_height: Cell<u32>,
    next_tile: Cell<u32>,
    tiles: RefCell<HashMap<FakeTile, TileState>>,
    children: RefCell<Vec<FakeTile>>,
    events: RefCell<Vec<(u64, GridEvent)>>,
    pending_load: RefCell<Option<Task>>,
    resize_handlers: RefCell<Vec<Box<dyn FnMut()>>>,
    refuse_timers: Cell<bool>,
}

impl FakePlatform {
    /// Sprite not loaded yet; call `fire_load` to start drawing.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            url: Some("sprite.jpg".to_string()),
            loaded: false,
            viewport: Cell::new(Viewport::new(width, height)),
            clock: RefCell::new(Clock::default()),
            grid_size: Cell::new((0, 0)),
            overlay_height: Cell::new(0),
            next_tile: Cell::new(0),
            tiles: RefCell::new(HashMap::new()),
            children: RefCell::new(Vec::new()),
            events: RefCell::new(Vec::new()),
            pending_load: RefCell::new(None),
            resize_handlers: RefCell::new(Vec::new()),
            refuse_timers: Cell::new(false),
        }
    }

    /// Sprite already in the cache: attaching draws immediately.
    pub fn loaded(width: u32, height: u32) -> Self {
        Self {
            loaded: true,
            ..Self::new(width, height)
        }
    }

    /// Source element without a `src`.
    pub fn without_source(width: u32, height: u32) -> Self {
        Self {
            url: None,
            ..Self::new(width, height)
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.borrow().now
    }

    /// Deliver the sprite's load event.
    pub fn fire_load(&self) {
        let task = self.pending_load.borrow_mut().take();
        if let Some(task) = task {
            task();
        }
    }

    /// Change the viewport and notify resize listeners.
    pub fn resize(&self, width: u32, height: u32) {
        self.viewport.set(Viewport::new(width, height));
        for handler in self.resize_handlers.borrow_mut().iter_mut() {
            handler();
        }
    }

    /// Run every timer due within the next `ms` milliseconds, in due order
    /// and, for equal due times, in scheduling order.
    pub fn advance(&self, ms: u64) {
        let target = self.now() + ms;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let position = clock
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                match position {
                    Some(i) => {
                        let timer = clock.queue.remove(i);
                        clock.now = timer.due;
                        Some(timer.task)
                    }
                    None => None,
                }
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.clock.borrow_mut().now = target;
    }

    /// Run until no timers remain.
    pub fn run_until_idle(&self) {
        loop {
            let last_due = self.clock.borrow().queue.iter().map(|t| t.due).max();
            let Some(due) = last_due else {
                break;
            };
            let now = self.now();
            self.advance(due.saturating_sub(now));
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.clock.borrow().queue.len()
    }

    pub fn set_refuse_timers(&self, refuse: bool) {
        self.refuse_timers.set(refuse);
    }

    pub fn events(&self) -> Vec<GridEvent> {
        self.events.borrow().iter().map(|(_, e)| *e).collect()
    }

    pub fn timed_events(&self) -> Vec<(u64, GridEvent)> {
        self.events.borrow().clone()
    }

    pub fn count(&self, event: GridEvent) -> usize {
        self.events.borrow().iter().filter(|(_, e)| *e == event).count()
    }

    pub fn grid_size(&self) -> (u32, u32) {
        self.grid_size.get()
    }

    pub fn overlay_height(&self) -> u32 {
        self.overlay_height.get()
    }

    /// Tiles currently in the grid, in document order.
    pub fn children(&self) -> Vec<FakeTile> {
        self.children.borrow().clone()
    }

    /// Cell index of each child, in document order.
    pub fn child_cells(&self) -> Vec<u32> {
        let tiles = self.tiles.borrow();
        let children = self.children.borrow();
        children.iter().map(|t| tiles[t].spec.cell).collect()
    }

    pub fn tile(&self, tile: FakeTile) -> TileState {
        self.tiles.borrow()[&tile].clone()
    }

    pub fn visible_children(&self) -> usize {
        let tiles = self.tiles.borrow();
        let children = self.children.borrow();
        children.iter().filter(|t| !tiles[*t].hidden).count()
    }

    pub fn flipped_children(&self) -> usize {
        let tiles = self.tiles.borrow();
        let children = self.children.borrow();
        children.iter().filter(|t| tiles[*t].flipped).count()
    }

    fn position(&self, tile: &FakeTile) -> Result<usize> {
        self.children
            .borrow()
            .iter()
            .position(|t| t == tile)
            .ok_or_else(|| GridError::Dom(format!("{tile:?} is not in the grid")))
    }
}

impl Platform for FakePlatform {
    type Tile = FakeTile;

    fn source_url(&self) -> Option<String> {
        self.url.clone()
    }

    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn set_grid_size(&self, width_px: u32, height_px: u32) {
        self.grid_size.set((width_px, height_px));
    }

    fn set_overlay_height(&self, height_px: u32) {
        self.overlay_height.set(height_px);
    }

    fn build_tile(&self, spec: &TileSpec) -> Result<FakeTile> {
        let tile = FakeTile(self.next_tile.get());
        self.next_tile.set(tile.0 + 1);
        self.tiles.borrow_mut().insert(
            tile,
            TileState {
                spec: spec.clone(),
                flipped: spec.flipped,
                hidden: false,
                removed: false,
            },
        );
        Ok(tile)
    }

    fn replace_tile(&self, old: &FakeTile, tile: &FakeTile) -> Result<()> {
        let index = self.position(old)?;
        self.children.borrow_mut()[index] = *tile;
        self.tiles.borrow_mut().get_mut(old).unwrap().removed = true;
        Ok(())
    }

    fn insert_tile(&self, tile: &FakeTile, before: Option<&FakeTile>) -> Result<()> {
        match before {
            Some(next) => {
                let index = self.position(next)?;
                self.children.borrow_mut().insert(index, *tile);
            }
            None => self.children.borrow_mut().push(*tile),
        }
        Ok(())
    }

    fn remove_tile(&self, tile: &FakeTile) {
        self.children.borrow_mut().retain(|t| t != tile);
        if let Some(state) = self.tiles.borrow_mut().get_mut(tile) {
            state.removed = true;
        }
    }

    fn hide_tile(&self, tile: &FakeTile) {
        if let Some(state) = self.tiles.borrow_mut().get_mut(tile) {
            state.hidden = true;
        }
    }

    fn unflip_tile(&self, tile: &FakeTile) {
        if let Some(state) = self.tiles.borrow_mut().get_mut(tile) {
            state.flipped = false;
        }
    }

    fn set_timeout(&self, delay_ms: u32, task: Task) -> Result<TimerHandle> {
        if self.refuse_timers.get() {
            return Err(GridError::Timer("timers disabled".to_string()));
        }
        let mut clock = self.clock.borrow_mut();
        clock.seq += 1;
        clock.next_handle += 1;
        let timer = Timer {
            due: clock.now + u64::from(delay_ms),
            seq: clock.seq,
            handle: clock.next_handle,
            task,
        };
        let handle = TimerHandle(timer.handle);
        clock.queue.push(timer);
        Ok(handle)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.clock
            .borrow_mut()
            .queue
            .retain(|t| t.handle != handle.0);
    }

    fn emit(&self, event: GridEvent) {
        let now = self.now();
        self.events.borrow_mut().push((now, event));
    }

    fn on_source_ready(&self, task: Task) -> Result<()> {
        if self.loaded {
            task();
        } else {
            *self.pending_load.borrow_mut() = Some(task);
        }
        Ok(())
    }

    fn on_resize(&self, handler: Box<dyn FnMut()>) -> Result<()> {
        self.resize_handlers.borrow_mut().push(handler);
        Ok(())
    }
}

/// Attach a widget with `options` to a fresh 1000x600 fake and load the sprite.
pub fn drawn_widget(options: Options) -> GridWidget<FakePlatform> {
    let widget = GridWidget::attach(FakePlatform::new(1000, 600), options).unwrap();
    widget.platform().fire_load();
    widget
}
