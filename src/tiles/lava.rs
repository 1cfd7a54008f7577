use std::f32::consts::TAU;

use macroquad::color::Color;
use macroquad::math::{vec2, Vec2};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::{rgb, GeometryBuilder, TileFrame};

const FLOWS: usize = 3;
const FLOW_POINTS: usize = 7;
const BUBBLES: usize = 4;
const BUBBLE_SIDES: usize = 8;

pub(super) fn build(frame: &TileFrame, phase: f32, rng: &mut ChaCha8Rng, out: &mut GeometryBuilder) {
    frame.outline(out, rgb(80, 0, 0));

    let scale = frame.scale();
    let content = rgb(255, 80, 0);
    let highlight = rgb(255, 200, 0);
    let glow = 0.5 - 0.5 * phase.cos();

    for f in 0..FLOWS {
        let v = 0.25 + f as f32 * 0.25;
        let lag = rng.gen_range(0.0..TAU);
        let points: Vec<Vec2> = (0..FLOW_POINTS)
            .map(|i| {
                let t = i as f32 / (FLOW_POINTS - 1) as f32;
                let drift = (phase + lag + t * TAU).sin() * 2.0 * scale;
                frame.point(t, v) + vec2(0.0, drift)
            })
            .collect();
        let mix = (glow + f as f32 / FLOWS as f32).fract();
        out.polyline(&points, lerp(content, highlight, mix));
    }

    for _ in 0..BUBBLES {
        let center = frame.point(rng.gen_range(0.2..0.8), rng.gen_range(0.2..0.8));
        let base = rng.gen_range(1.5..3.0) * scale;
        let lag = rng.gen_range(0.0..TAU);
        let radius = base * (1.0 + 0.4 * (phase + lag).sin());
        let rim: Vec<Vec2> = (0..BUBBLE_SIDES)
            .map(|i| {
                let a = i as f32 / BUBBLE_SIDES as f32 * TAU;
                center + vec2(a.cos() * radius, a.sin() * radius * 0.5)
            })
            .collect();
        out.polygon(&rim, highlight);
    }
}

fn lerp(a: Color, b: Color, t: f32) -> Color {
    Color::new(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}
