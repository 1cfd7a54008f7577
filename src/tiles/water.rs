use std::f32::consts::TAU;

use crate::geometry::{rgb, GeometryBuilder, TileFrame};

const SEGMENTS: usize = 10;
const AMPLITUDE: f32 = 3.0;
// (v across the tile, phase lag)
const WAVES: [(f32, f32); 2] = [(0.35, 0.0), (0.65, 1.7)];

pub(super) fn build(frame: &TileFrame, phase: f32, out: &mut GeometryBuilder) {
    frame.outline(out, rgb(0, 51, 102));

    let color = rgb(0, 102, 204);
    let amplitude = AMPLITUDE * frame.scale();
    let mut points = [frame.center(); SEGMENTS + 1];
    for (v, lag) in WAVES {
        for (i, p) in points.iter_mut().enumerate() {
            let t = i as f32 / SEGMENTS as f32;
            let u = 0.1 + 0.8 * t;
            *p = frame.point(u, v) + frame.up((phase + lag + t * TAU).sin() * amplitude);
        }
        out.polyline(&points, color);
    }
}
