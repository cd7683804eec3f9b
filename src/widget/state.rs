//! Mutable draw-pass bookkeeping shared by the widget and its timer callbacks.

use crate::layout::GridLayout;
use crate::platform::TimerHandle;
use crate::tile::TileSlots;

/// Identifies one `draw()` invocation.
///
/// Callbacks capture the id of the pass that scheduled them and do nothing
/// once a later pass (or a resize) has retired it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PassId(pub u64);

/// Progress of the active draw pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No pass running (before the first draw, or after a resize retired one).
    #[default]
    Idle,
    /// Grid sized for the viewport; no cells scheduled yet.
    LayoutComputed,
    /// Every cell has an insertion timer.
    CellsScheduled,
    /// At least one tile is in the grid and waiting to settle.
    CellsSettling,
    /// Every cell settled and `draw:complete` was emitted.
    Complete,
}

pub(crate) struct DrawState<T> {
    pub(crate) phase: Phase,
    pub(crate) layout: Option<GridLayout>,
    pub(crate) active_pass: Option<PassId>,
    last_pass: u64,
    pub(crate) boxes_drawn: u32,
    pub(crate) pending_redraw: Option<TimerHandle>,
    pub(crate) tiles: TileSlots<T>,
}

impl<T: Clone> DrawState<T> {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Idle,
            layout: None,
            active_pass: None,
            last_pass: 0,
            boxes_drawn: 0,
            pending_redraw: None,
            tiles: TileSlots::new(),
        }
    }

    /// Open a new pass for `layout`, retiring whatever was running.
    pub(crate) fn begin_pass(&mut self, layout: GridLayout) -> PassId {
        self.last_pass = self.last_pass.wrapping_add(1);
        let pass = PassId(self.last_pass);
        self.active_pass = Some(pass);
        self.boxes_drawn = 0;
        self.layout = Some(layout);
        self.phase = Phase::LayoutComputed;
        pass
    }

    /// Retire the active pass without starting another.
    pub(crate) fn retire_pass(&mut self) {
        self.active_pass = None;
        self.phase = Phase::Idle;
    }

    pub(crate) fn is_active(&self, pass: PassId) -> bool {
        self.active_pass == Some(pass)
    }

    /// Move the active pass to `phase`; stale passes are ignored.
    pub(crate) fn advance(&mut self, pass: PassId, phase: Phase) {
        if self.is_active(pass) {
            self.phase = phase;
        }
    }

    /// Count one settled cell. Returns `true` exactly once per pass, when the
    /// last cell settles.
    pub(crate) fn record_settled(&mut self, pass: PassId) -> bool {
        if !self.is_active(pass) {
            return false;
        }
        let Some(cells) = self.layout.map(|l| l.cells) else {
            return false;
        };
        if self.boxes_drawn >= cells {
            return false;
        }
        self.boxes_drawn += 1;
        if self.boxes_drawn == cells {
            self.phase = Phase::Complete;
            return true;
        }
        false
    }
}
