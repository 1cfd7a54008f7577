//! Grid <-> screen conversion for 2:1 isometric tiles.
//!
//! ```text
//!              top (anchor)
//!           __--*--__
//!      __---         ---__
//! left *                   * right
//!      ---__         __---
//!           --*----
//!             bottom
//! ```
//!
//! A tile's anchor is the top corner of its diamond. Screen y grows downward,
//! so the diamond anchored at `p` covers `[p.x - w/2, p.x + w/2] x [p.y, p.y + h]`.

use macroquad::math::{vec2, Vec2};

use crate::level::GridPosition;

/// Tile width to height ratio.
pub const TILE_ASPECT: f32 = 2.0;

/// Projects a (possibly fractional) grid coordinate to screen space.
#[inline]
pub fn to_screen(grid: Vec2, offset: Vec2, tile_width: f32, tile_height: f32) -> Vec2 {
    vec2(
        offset.x + (grid.x - grid.y) * tile_width / 2.0,
        offset.y + (grid.x + grid.y) * tile_height / 2.0,
    )
}

/// Closed-form inverse of [`to_screen`].
#[inline]
pub fn to_grid(screen: Vec2, offset: Vec2, tile_width: f32, tile_height: f32) -> Vec2 {
    // a = x - y, b = x + y
    let a = (screen.x - offset.x) * 2.0 / tile_width;
    let b = (screen.y - offset.y) * 2.0 / tile_height;
    vec2((a + b) / 2.0, (b - a) / 2.0)
}

/// Projection bound to one tile size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjection {
    tile_width: f32,
}

impl IsoProjection {
    /// Projection for tiles `tile_width` pixels wide.
    pub fn new(tile_width: f32) -> Self {
        Self { tile_width }
    }

    /// Tile width in pixels.
    #[inline]
    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    /// Tile height, half the width.
    #[inline]
    pub fn tile_height(&self) -> f32 {
        self.tile_width / TILE_ASPECT
    }

    /// See [`to_screen`].
    #[inline]
    pub fn to_screen(&self, grid: Vec2, offset: Vec2) -> Vec2 {
        to_screen(grid, offset, self.tile_width, self.tile_height())
    }

    /// See [`to_grid`].
    #[inline]
    pub fn to_grid(&self, screen: Vec2, offset: Vec2) -> Vec2 {
        to_grid(screen, offset, self.tile_width, self.tile_height())
    }

    /// Screen anchor of a cell.
    #[inline]
    pub fn cell_to_screen(&self, pos: GridPosition, offset: Vec2) -> Vec2 {
        self.to_screen(vec2(pos.x as f32, pos.y as f32), offset)
    }

    /// Screen rectangle `(min, max)` covered by the diamond anchored at `anchor`.
    #[inline]
    pub fn tile_rect(&self, anchor: Vec2) -> (Vec2, Vec2) {
        let half_w = self.tile_width / 2.0;
        (
            vec2(anchor.x - half_w, anchor.y),
            vec2(anchor.x + half_w, anchor.y + self.tile_height()),
        )
    }
}
