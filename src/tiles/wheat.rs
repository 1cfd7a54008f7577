use std::f32::consts::TAU;

use macroquad::math::vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::{rgb, GeometryBuilder, TileFrame};

const FURROWS: usize = 4;
const STALKS: usize = 12;

pub(super) fn build(frame: &TileFrame, phase: f32, rng: &mut ChaCha8Rng, out: &mut GeometryBuilder) {
    frame.outline(out, rgb(120, 100, 40));

    let scale = frame.scale();
    let soil = rgb(120, 90, 60);
    for f in 0..FURROWS {
        let u = 0.2 + f as f32 * 0.2;
        out.line(frame.point(u, 0.1), frame.point(u, 0.9), soil);
    }

    let stalk = rgb(220, 190, 100);
    let head = rgb(240, 210, 120);
    for _ in 0..STALKS {
        let row = rng.gen_range(0..FURROWS);
        let u = 0.2 + row as f32 * 0.2;
        let root = frame.point(u, rng.gen_range(0.15..0.85));
        let height = rng.gen_range(10.0..16.0) * scale;
        let lag = rng.gen_range(0.0..TAU / 4.0);
        let sway = (phase + lag).sin() * 2.5 * scale;

        let tip = root + frame.up(height) + vec2(sway, 0.0);
        out.line(root, tip, stalk);

        // ear with two awns
        let ear = tip + frame.up(3.0 * scale) + vec2(sway * 0.3, 0.0);
        out.line(tip, ear, head);
        out.line(ear, ear + vec2(-1.5 * scale, -2.0 * scale), head);
        out.line(ear, ear + vec2(1.5 * scale, -2.0 * scale), head);
    }
}
