// src/instance.rs
use std::rc::Rc;

use macroquad::math::Vec2;

use crate::geometry::VertexGeometry;
use crate::level::{GridPosition, TileTypeId};
use crate::render::DrawableId;
use crate::tiles::AnimationState;

/// Identifies one cell of one layer. Field order makes the derived `Ord`
/// the painter's order: layer first, then row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawKey {
    /// Layer index in composition order.
    pub layer: usize,
    /// Row.
    pub y: u32,
    /// Column.
    pub x: u32,
}

impl DrawKey {
    /// Key for `(layer, x, y)`.
    pub const fn new(layer: usize, x: u32, y: u32) -> Self {
        Self { layer, y, x }
    }

    /// Grid position of the cell.
    #[inline]
    pub fn position(&self) -> GridPosition {
        GridPosition::new(self.x, self.y)
    }
}

/// A realized cell: cached geometry attached to the draw batch.
#[derive(Debug, Clone)]
pub struct TileInstance {
    pub(crate) key: DrawKey,
    pub(crate) type_id: TileTypeId,
    pub(crate) state: AnimationState,
    pub(crate) geometry: Rc<VertexGeometry>,
    pub(crate) drawable: DrawableId,
    pub(crate) screen: Vec2,
}

impl TileInstance {
    /// Cell this instance renders.
    pub fn key(&self) -> DrawKey {
        self.key
    }

    /// Tile type.
    pub fn type_id(&self) -> TileTypeId {
        self.type_id
    }

    /// Animation state the geometry was fetched for.
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Shared geometry.
    pub fn geometry(&self) -> &Rc<VertexGeometry> {
        &self.geometry
    }

    /// Backend handle.
    pub fn drawable(&self) -> DrawableId {
        self.drawable
    }

    /// Screen position of the tile's top corner.
    pub fn screen(&self) -> Vec2 {
        self.screen
    }
}
