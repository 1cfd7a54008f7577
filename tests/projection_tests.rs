// tests/projection_tests.rs

use macroquad::math::vec2;
use macroquad_isoline::{to_grid, to_screen, GridPosition, IsoProjection};

#[test]
fn concrete_points() {
    let offset = vec2(0.0, 0.0);
    assert_eq!(to_screen(vec2(2.0, 1.0), offset, 128.0, 64.0), vec2(64.0, 96.0));
    assert_eq!(to_screen(vec2(0.0, 0.0), offset, 128.0, 64.0), vec2(0.0, 0.0));
}

#[test]
fn round_trip_over_grid_and_offsets() {
    let offsets = [
        vec2(0.0, 0.0),
        vec2(400.0, 300.0),
        vec2(-1234.5, 87.25),
        vec2(1.0e4, -3.0e3),
    ];
    for offset in offsets {
        for y in -20..=20 {
            for x in -20..=20 {
                let grid = vec2(x as f32 * 0.75, y as f32 * 1.25);
                let back = to_grid(to_screen(grid, offset, 128.0, 64.0), offset, 128.0, 64.0);
                assert!(
                    (back - grid).abs().max_element() < 1e-2,
                    "{grid:?} -> {back:?} at {offset:?}"
                );
            }
        }
    }
}

#[test]
fn cell_anchors_tile_the_plane() {
    let p = IsoProjection::new(100.0);
    let offset = vec2(13.0, -7.0);
    let a = p.cell_to_screen(GridPosition::new(3, 4), offset);
    let b = p.cell_to_screen(GridPosition::new(4, 5), offset);
    // diagonal neighbour sits one full tile height below
    assert_eq!(b - a, vec2(0.0, p.tile_height()));
    let (min, max) = p.tile_rect(a);
    assert_eq!(max - min, vec2(100.0, 50.0));
    let centre = p.to_grid(vec2(a.x, a.y + p.tile_height() / 2.0), offset);
    assert!((centre - vec2(3.5, 4.5)).length() < 1e-4);
}
