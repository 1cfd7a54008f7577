use macroquad::math::vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::{rgb, shade, GeometryBuilder, TileFrame};

const BLADES: usize = 15;
const MAX_SWAY: f32 = 3.0;

pub(super) fn build(frame: &TileFrame, phase: f32, rng: &mut ChaCha8Rng, out: &mut GeometryBuilder) {
    frame.outline(out, rgb(34, 85, 34));

    let scale = frame.scale();
    let sway = phase.sin() * MAX_SWAY * scale;
    // brightest mid-cycle
    let blade = shade(rgb(0, 204, 0), 0.9 + 0.2 * (0.5 - 0.5 * phase.cos()));

    for _ in 0..BLADES {
        let root = frame.point(rng.gen_range(0.25..0.75), rng.gen_range(0.25..0.75));
        let height = rng.gen_range(5.0..15.0) * scale;
        let lean: f32 = rng.gen_range(-1.0..1.0);
        let tip = root + frame.up(height) + vec2(sway * lean, 0.0);
        out.line(root, tip, blade);
    }
}
