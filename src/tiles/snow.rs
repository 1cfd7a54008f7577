use std::f32::consts::{PI, TAU};

use macroquad::math::vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::{rgb, GeometryBuilder, TileFrame};

const FLAKES: usize = 6;
const ARMS: usize = 6;
const DRIFTS: usize = 3;

pub(super) fn build(frame: &TileFrame, phase: f32, rng: &mut ChaCha8Rng, out: &mut GeometryBuilder) {
    frame.outline(out, rgb(200, 210, 220));

    let scale = frame.scale();
    let drift = rgb(200, 220, 235);
    for _ in 0..DRIFTS {
        let u = rng.gen_range(0.2..0.6);
        let v = rng.gen_range(0.2..0.8);
        let len = rng.gen_range(0.15..0.3);
        let crest = rng.gen_range(1.0..3.0) * scale;
        let a = frame.point(u, v);
        let b = frame.point(u + len, v);
        let mid = (a + b) / 2.0 + frame.up(crest);
        out.polyline(&[a, mid, b], drift);
    }

    let flake = rgb(240, 245, 250);
    for _ in 0..FLAKES {
        let center = frame.point(rng.gen_range(0.15..0.85), rng.gen_range(0.15..0.85));
        let size = rng.gen_range(1.5..3.5) * scale;
        let spin = rng.gen_range(0.5..1.5);
        // a flake looks the same every sixth of a turn
        let rotation = phase * spin * (PI / 3.0) / TAU;
        let fall = (phase / TAU) * 4.0 * scale;
        let center = center + vec2(0.0, fall);
        for arm in 0..ARMS {
            let a = rotation + arm as f32 / ARMS as f32 * TAU;
            out.line(center, center + vec2(a.cos(), a.sin()) * size, flake);
        }
    }
}
