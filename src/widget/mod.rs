//! The grid widget: draw passes, staggered insertion, settling and
//! debounced redraws.
//!
//! A draw pass sizes the grid for the viewport, then schedules one insertion
//! timer per cell with a delay proportional to the cell index. Each inserted
//! tile settles (unflips) after a fixed delay; when the last one settles the
//! widget announces `draw:complete`.
//!
//! Timer callbacks hold a `Weak` reference to the widget and the id of the
//! pass that scheduled them, so dropping the widget or starting a new pass
//! turns them into no-ops.

mod state;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

pub use state::{PassId, Phase};

use crate::error::{GridError, Result};
use crate::layout::GridLayout;
use crate::options::{Options, REDRAW_DEBOUNCE_MS};
use crate::platform::{GridEvent, Platform};
use crate::sprite::SpriteStrip;
use crate::tile::{Placement, TileSpec};
use state::DrawState;

/// Animated sprite grid over a [`Platform`].
pub struct GridWidget<P: Platform + 'static> {
    shared: Rc<Shared<P>>,
}

impl<P: Platform + 'static> Clone for GridWidget<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

struct Shared<P: Platform> {
    platform: P,
    options: Options,
    strip: SpriteStrip,
    state: RefCell<DrawState<P::Tile>>,
}

impl<P: Platform + 'static> GridWidget<P> {
    /// Wire the widget to `platform`.
    ///
    /// The first draw runs once the sprite has loaded (right away if it
    /// already has); every viewport resize triggers a debounced redraw.
    ///
    /// # Errors
    /// Fails if the source element has no sprite URL, the strip metrics are
    /// degenerate, or the platform cannot register its listeners.
    pub fn attach(platform: P, options: Options) -> Result<Self> {
        let url = platform
            .source_url()
            .ok_or_else(|| GridError::MissingSource(options.image_selector.clone()))?;
        let strip = SpriteStrip::new(url, &options)?;

        if options.debug {
            log::debug!(
                "Images url={} total={} totalWidth={}",
                strip.url(),
                strip.image_total(),
                options.image_width
            );
        }

        let widget = Self {
            shared: Rc::new(Shared {
                platform,
                options,
                strip,
                state: RefCell::new(DrawState::new()),
            }),
        };

        let weak = Rc::downgrade(&widget.shared);
        widget.shared.platform.on_resize(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.delayed_redraw();
            }
        }))?;

        let weak = Rc::downgrade(&widget.shared);
        widget.shared.platform.on_source_ready(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                if let Err(e) = shared.draw() {
                    log::error!("initial draw failed: {e}");
                }
            }
        }))?;

        Ok(widget)
    }

    /// Start a full redraw now.
    ///
    /// # Errors
    /// Fails if a tile cannot be built or its timer cannot be scheduled.
    pub fn draw(&self) -> Result<()> {
        self.shared.draw()
    }

    /// Hide the current tiles and redraw once resizing has been quiet for
    /// [`REDRAW_DEBOUNCE_MS`].
    pub fn delayed_redraw(&self) {
        self.shared.delayed_redraw();
    }

    pub fn options(&self) -> &Options {
        &self.shared.options
    }

    pub fn strip(&self) -> &SpriteStrip {
        &self.shared.strip
    }

    pub fn platform(&self) -> &P {
        &self.shared.platform
    }

    /// Layout of the most recent pass.
    pub fn layout(&self) -> Option<GridLayout> {
        self.state().layout
    }

    /// Cells of the active pass that have settled.
    pub fn boxes_drawn(&self) -> u32 {
        self.state().boxes_drawn
    }

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    pub fn active_pass(&self) -> Option<PassId> {
        self.state().active_pass
    }

    /// Whether a debounced redraw is waiting to fire.
    pub fn redraw_pending(&self) -> bool {
        self.state().pending_redraw.is_some()
    }

    /// Tile currently placed in `cell`.
    pub fn tile(&self, cell: u32) -> Option<P::Tile> {
        self.state().tiles.get(cell).cloned()
    }

    fn state(&self) -> Ref<'_, DrawState<P::Tile>> {
        self.shared.state.borrow()
    }
}

// No `RefCell` borrow may be held across a platform call: emitting an event
// runs listeners synchronously and they are free to call back in.
impl<P: Platform + 'static> Shared<P> {
    fn draw(self: &Rc<Self>) -> Result<()> {
        self.platform.emit(GridEvent::DrawStart);

        let layout = GridLayout::compute(self.platform.viewport(), self.strip.box_size())?;
        let (pass, dropped) = {
            let mut state = self.state.borrow_mut();
            let pass = state.begin_pass(layout);
            (pass, state.tiles.truncate(layout.cells))
        };
        for tile in &dropped {
            self.platform.remove_tile(tile);
        }

        self.platform
            .set_grid_size(layout.width_px(), layout.height_px());
        if self.options.debug {
            log::debug!(
                "DIMENSIONS columns={} rows={} cells={}",
                layout.columns,
                layout.rows,
                layout.cells
            );
        }
        self.platform.set_overlay_height(layout.height_px());

        for cell in 0..layout.cells {
            self.schedule_cell(pass, cell)?;
        }
        self.state
            .borrow_mut()
            .advance(pass, Phase::CellsScheduled);
        Ok(())
    }

    fn schedule_cell(self: &Rc<Self>, pass: PassId, cell: u32) -> Result<()> {
        let spec = TileSpec::for_cell(&self.strip, cell, self.options.use_flip);
        if self.options.debug {
            log::debug!("Drawn! cell={} image={}", cell, spec.image_index);
        }
        let tile = self.platform.build_tile(&spec)?;

        let weak = Rc::downgrade(self);
        self.platform.set_timeout(
            self.options.stagger_delay_ms(cell),
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.insert_cell(pass, cell, tile);
                }
            }),
        )?;
        Ok(())
    }

    fn insert_cell(self: &Rc<Self>, pass: PassId, cell: u32, tile: P::Tile) {
        let placement = {
            let mut state = self.state.borrow_mut();
            if !state.is_active(pass) {
                return;
            }
            state.phase = Phase::CellsSettling;
            state.tiles.place(cell, tile.clone())
        };

        let inserted = match &placement {
            Placement::Replace(old) => self.platform.replace_tile(old, &tile),
            Placement::Before(next) => self.platform.insert_tile(&tile, Some(next)),
            Placement::Append => self.platform.insert_tile(&tile, None),
        };
        if let Err(e) = inserted {
            log::error!("failed to insert tile for cell {cell}: {e}");
        }

        let weak = Rc::downgrade(self);
        let settle = Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.settle_cell(pass, &tile);
            }
        });
        if let Err(e) = self
            .platform
            .set_timeout(self.options.settle_delay_ms(), settle)
        {
            log::error!("failed to schedule settle for cell {cell}: {e}");
        }
    }

    fn settle_cell(&self, pass: PassId, tile: &P::Tile) {
        if !self.state.borrow().is_active(pass) {
            return;
        }
        if self.options.use_flip {
            self.platform.unflip_tile(tile);
        }
        let complete = self.state.borrow_mut().record_settled(pass);
        if complete {
            self.platform.emit(GridEvent::DrawComplete);
        }
    }

    fn delayed_redraw(self: &Rc<Self>) {
        let (pending, tiles) = {
            let mut state = self.state.borrow_mut();
            state.retire_pass();
            let tiles: Vec<P::Tile> = state.tiles.tiles().cloned().collect();
            (state.pending_redraw.take(), tiles)
        };
        if let Some(handle) = pending {
            self.platform.clear_timeout(handle);
        }
        // Hidden right away so a grid sized for the old viewport never shows.
        for tile in &tiles {
            self.platform.hide_tile(tile);
        }

        let weak = Rc::downgrade(self);
        let redraw = Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.state.borrow_mut().pending_redraw = None;
                if let Err(e) = shared.draw() {
                    log::error!("redraw failed: {e}");
                }
            }
        });
        match self.platform.set_timeout(REDRAW_DEBOUNCE_MS, redraw) {
            Ok(handle) => self.state.borrow_mut().pending_redraw = Some(handle),
            Err(e) => log::error!("failed to schedule redraw: {e}"),
        }
    }
}
