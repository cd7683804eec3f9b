//! Tile descriptions and the cell-indexed table of placed tiles.

use crate::sprite::SpriteStrip;

/// Everything a platform needs to build one tile element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSpec {
    /// Grid cell the tile belongs to
    pub cell: u32,
    /// Image of the strip shown on the front face
    pub image_index: u32,
    /// Sprite URL for the front face
    pub image_url: String,
    /// CSS `background-position` cropping the front face
    pub background_position: String,
    /// Width and height of the tile and both faces
    pub size_px: u32,
    /// Start with the back face showing
    pub flipped: bool,
}

impl TileSpec {
    /// Describe the tile for `cell`.
    pub fn for_cell(strip: &SpriteStrip, cell: u32, flipped: bool) -> Self {
        let image_index = strip.resolve_image_index(cell);
        Self {
            cell,
            image_index,
            image_url: strip.url().to_string(),
            background_position: strip.background_position(image_index),
            size_px: strip.box_size(),
            flipped,
        }
    }
}

/// Where a newly inserted tile goes in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement<T> {
    /// Swap out the tile already drawn for this cell.
    Replace(T),
    /// Insert in front of the tile of a later cell.
    Before(T),
    /// Nothing follows; append to the grid.
    Append,
}

/// Placed tiles keyed by cell index.
///
/// Positions come from this table, never from child order in the document,
/// so tiles arriving out of order still land in their own cell.
#[derive(Debug, Clone)]
pub struct TileSlots<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for TileSlots<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: Clone> TileSlots<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `tile` at `cell` and say how to put it into the grid.
    pub fn place(&mut self, cell: u32, tile: T) -> Placement<T> {
        let index = usize::try_from(cell).unwrap_or(usize::MAX);
        if index >= self.slots.len() {
            self.slots.resize_with(index.saturating_add(1), || None);
        }
        let Some(slot) = self.slots.get_mut(index) else {
            return Placement::Append;
        };
        if let Some(old) = slot.replace(tile) {
            return Placement::Replace(old);
        }
        self.slots
            .iter()
            .skip(index.saturating_add(1))
            .flatten()
            .next()
            .cloned()
            .map_or(Placement::Append, Placement::Before)
    }

    /// Tile currently drawn for `cell`.
    pub fn get(&self, cell: u32) -> Option<&T> {
        let index = usize::try_from(cell).ok()?;
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Drop every tile at `cells` or beyond, returning them for removal.
    pub fn truncate(&mut self, cells: u32) -> Vec<T> {
        let keep = usize::try_from(cells).unwrap_or(usize::MAX);
        if keep >= self.slots.len() {
            return Vec::new();
        }
        self.slots.split_off(keep).into_iter().flatten().collect()
    }

    /// All placed tiles in cell order.
    pub fn tiles(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.tiles().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
