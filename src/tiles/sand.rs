use macroquad::math::vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::{rgb, shade, GeometryBuilder, TileFrame};

const GRAINS: usize = 20;
const RIPPLES: usize = 3;
const RIPPLE_POINTS: usize = 6;

pub(super) fn build(frame: &TileFrame, rng: &mut ChaCha8Rng, out: &mut GeometryBuilder) {
    frame.outline(out, rgb(139, 115, 85));

    let scale = frame.scale();
    let content = rgb(237, 201, 175);
    for _ in 0..GRAINS {
        let at = frame.point(rng.gen_range(0.1..0.9), rng.gen_range(0.1..0.9));
        let len = rng.gen_range(0.5..1.5) * scale;
        out.line(at, at + vec2(len, 0.0), shade(content, rng.gen_range(0.85..1.05)));
    }

    let ripple = shade(content, 0.9);
    for r in 0..RIPPLES {
        let v = 0.25 + r as f32 * 0.25;
        let points: Vec<_> = (0..RIPPLE_POINTS)
            .map(|i| {
                let u = 0.15 + 0.7 * i as f32 / (RIPPLE_POINTS - 1) as f32;
                let wobble = rng.gen_range(-1.0..1.0) * scale;
                frame.point(u, v) + frame.up(wobble)
            })
            .collect();
        out.polyline(&points, ripple);
    }
}
