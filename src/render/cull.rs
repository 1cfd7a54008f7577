//! Viewport culling for diamond tiles.
//!
//! View corners are mapped back to the grid to bound the candidate cells;
//! each candidate then gets an exact closed-interval test of its screen
//! rectangle against the viewport grown by the cull margin.

use macroquad::math::{vec2, Vec2};

use crate::projection::IsoProjection;

// Cells a view-corner lookup may be off by before the exact rect test.
const CULL_PAD_CELLS: i64 = 2;

/// Inclusive block of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    /// First column.
    pub x0: u32,
    /// Last column.
    pub x1: u32,
    /// First row.
    pub y0: u32,
    /// Last row.
    pub y1: u32,
}

impl CellRange {
    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y0..=self.y1).flat_map(move |y| (self.x0..=self.x1).map(move |x| (x, y)))
    }
}

/// Viewport `[0, size]` grown by `margin` on every side.
pub fn view_rect(viewport: Vec2, margin: f32) -> (Vec2, Vec2) {
    let m = vec2(margin, margin);
    (-m, viewport + m)
}

/// Closed-interval overlap: touching edges count.
#[inline]
pub fn intersects(a_min: Vec2, a_max: Vec2, b_min: Vec2, b_max: Vec2) -> bool {
    a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
}

/// Whether the tile anchored at `anchor` overlaps the view rect.
#[inline]
pub fn tile_visible(proj: &IsoProjection, anchor: Vec2, view_min: Vec2, view_max: Vec2) -> bool {
    let (min, max) = proj.tile_rect(anchor);
    intersects(min, max, view_min, view_max)
}

/// Grid cells of a `width` x `height` level that may overlap the view rect.
/// Superset of the visible cells; `None` when the view misses the level.
pub fn candidate_cells(
    proj: &IsoProjection,
    offset: Vec2,
    view_min: Vec2,
    view_max: Vec2,
    width: u32,
    height: u32,
) -> Option<CellRange> {
    if width == 0 || height == 0 {
        return None;
    }

    let corners = [
        view_min,
        vec2(view_max.x, view_min.y),
        view_max,
        vec2(view_min.x, view_max.y),
    ]
    .map(|c| proj.to_grid(c, offset));

    let (mut gmin, mut gmax) = (corners[0], corners[0]);
    for c in &corners[1..] {
        gmin = gmin.min(*c);
        gmax = gmax.max(*c);
    }
    if !(gmin.is_finite() && gmax.is_finite()) {
        return None;
    }

    let x0 = gmin.x.floor() as i64 - CULL_PAD_CELLS;
    let y0 = gmin.y.floor() as i64 - CULL_PAD_CELLS;
    let x1 = gmax.x.ceil() as i64 + CULL_PAD_CELLS;
    let y1 = gmax.y.ceil() as i64 + CULL_PAD_CELLS;

    let (w, h) = (width as i64, height as i64);
    if x1 < 0 || y1 < 0 || x0 >= w || y0 >= h {
        return None;
    }

    Some(CellRange {
        x0: x0.max(0) as u32,
        x1: x1.min(w - 1) as u32,
        y0: y0.max(0) as u32,
        y1: y1.min(h - 1) as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::GridPosition;

    #[test]
    fn touching_edges_intersect() {
        let a = (vec2(0.0, 0.0), vec2(10.0, 10.0));
        assert!(intersects(a.0, a.1, vec2(10.0, 10.0), vec2(20.0, 20.0)));
        assert!(!intersects(a.0, a.1, vec2(10.5, 0.0), vec2(20.0, 20.0)));
    }

    #[test]
    fn candidates_cover_every_visible_cell() {
        let proj = IsoProjection::new(64.0);
        let (view_min, view_max) = view_rect(vec2(300.0, 200.0), 16.0);
        for offset in [vec2(0.0, 0.0), vec2(150.0, -90.0), vec2(-400.0, 35.5)] {
            let range = candidate_cells(&proj, offset, view_min, view_max, 40, 40);
            for y in 0..40 {
                for x in 0..40 {
                    let anchor = proj.cell_to_screen(GridPosition::new(x, y), offset);
                    if tile_visible(&proj, anchor, view_min, view_max) {
                        let r = range.expect("visible cell outside candidate range");
                        assert!(x >= r.x0 && x <= r.x1 && y >= r.y0 && y <= r.y1);
                    }
                }
            }
        }
    }

    #[test]
    fn far_away_view_has_no_candidates() {
        let proj = IsoProjection::new(64.0);
        let (view_min, view_max) = view_rect(vec2(100.0, 100.0), 0.0);
        assert_eq!(
            candidate_cells(&proj, vec2(10_000.0, 10_000.0), view_min, view_max, 8, 8),
            None
        );
    }

    #[test]
    fn cells_iterate_row_major() {
        let r = CellRange { x0: 1, x1: 2, y0: 0, y1: 1 };
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells, vec![(1, 0), (2, 0), (1, 1), (2, 1)]);
    }
}
