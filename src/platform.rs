//! Capabilities the widget needs from its host.
//!
//! The browser implementation lives in `viewer::dom`; tests drive the widget
//! through a fake with a manual clock.

use crate::error::Result;
use crate::layout::Viewport;
use crate::tile::TileSpec;

/// Event prefix used by the original widget.
const EVENT_NAMESPACE: &str = "GridActually";

/// Lifecycle events announced on the grid element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridEvent {
    /// A draw pass started.
    DrawStart,
    /// Every cell of the pass has settled.
    DrawComplete,
}

impl GridEvent {
    /// Short name without the namespace.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::DrawStart => "draw:start",
            Self::DrawComplete => "draw:complete",
        }
    }

    /// DOM event type, e.g. `GridActually:draw:start`.
    pub fn event_type(self) -> String {
        format!("{EVENT_NAMESPACE}:{}", self.short_name())
    }
}

/// Opaque id of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

/// Deferred work handed to [`Platform::set_timeout`].
pub type Task = Box<dyn FnOnce()>;

/// Host services: layout queries, element construction, timers and events.
///
/// All calls happen on the single UI thread. Implementations must not run a
/// scheduled [`Task`] synchronously from `set_timeout`.
pub trait Platform {
    /// Handle to one tile element.
    type Tile: Clone + 'static;

    /// URL of the sprite strip, if the source element carries one.
    fn source_url(&self) -> Option<String>;

    /// Current viewport size.
    fn viewport(&self) -> Viewport;

    /// Size the grid element.
    fn set_grid_size(&self, width_px: u32, height_px: u32);

    /// Size the overlay element.
    fn set_overlay_height(&self, height_px: u32);

    /// Construct a tile element; it is not inserted yet.
    fn build_tile(&self, spec: &TileSpec) -> Result<Self::Tile>;

    /// Put `tile` in place of `old`.
    fn replace_tile(&self, old: &Self::Tile, tile: &Self::Tile) -> Result<()>;

    /// Insert `tile` into the grid before `before`, or at the end.
    fn insert_tile(&self, tile: &Self::Tile, before: Option<&Self::Tile>) -> Result<()>;

    /// Take `tile` out of the grid.
    fn remove_tile(&self, tile: &Self::Tile);

    /// Hide `tile` without removing it.
    fn hide_tile(&self, tile: &Self::Tile);

    /// Show the front face of `tile`.
    fn unflip_tile(&self, tile: &Self::Tile);

    /// Run `task` after `delay_ms`.
    fn set_timeout(&self, delay_ms: u32, task: Task) -> Result<TimerHandle>;

    /// Cancel a pending timer; unknown or fired handles are ignored.
    fn clear_timeout(&self, handle: TimerHandle);

    /// Announce a lifecycle event to listeners on the grid.
    fn emit(&self, event: GridEvent);

    /// Run `task` once the sprite has loaded, immediately if it already has.
    fn on_source_ready(&self, task: Task) -> Result<()>;

    /// Run `handler` on every viewport resize.
    fn on_resize(&self, handler: Box<dyn FnMut()>) -> Result<()>;
}
