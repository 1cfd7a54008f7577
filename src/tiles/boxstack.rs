use macroquad::color::Color;
use macroquad::math::{vec2, Vec2};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::{rgb, shade, GeometryBuilder, TileFrame};

const LAYERS: usize = 3;
// horizontal shift per layer above the ground, by state
const SHIFT: [f32; 3] = [0.0, 1.0, -1.0];

pub(super) fn build(frame: &TileFrame, state: u8, rng: &mut ChaCha8Rng, out: &mut GeometryBuilder) {
    frame.outline(out, rgb(50, 50, 50));

    let palette = [
        rgb(180, 130, 80),
        rgb(150, 150, 150),
        rgb(80, 120, 160),
        rgb(160, 80, 80),
    ];
    let scale = frame.scale();
    let step = SHIFT[state as usize % SHIFT.len()] * 2.0 * scale;
    let mut base = frame.center() + vec2(0.0, frame.height * 0.2);
    let mut size = frame.width * 0.32;

    for layer in 0..LAYERS {
        let color = palette.choose(rng).copied().unwrap_or(palette[0]);
        let height = rng.gen_range(0.6..0.9) * size * 0.5;
        let at = base + vec2(step * layer as f32, 0.0);
        crate_box(out, at, size, height, color);
        base = base + frame.up(height);
        size *= 0.75;
    }
}

// Isometric box whose bottom front corner sits at `at`.
fn crate_box(out: &mut GeometryBuilder, at: Vec2, size: f32, height: f32, color: Color) {
    let hw = size / 2.0;
    let hh = size / 4.0;
    let bottom = [
        at,
        at + vec2(hw, -hh),
        at + vec2(0.0, -2.0 * hh),
        at + vec2(-hw, -hh),
    ];
    let top = bottom.map(|p| p - vec2(0.0, height));

    out.polygon(&top, shade(color, 1.2));
    // hidden back corner has no vertical edge
    for i in [0, 1, 3] {
        out.line(bottom[i], top[i], color);
    }
    out.polyline(&[bottom[3], bottom[0], bottom[1]], shade(color, 0.8));
}
