use std::f32::consts::{PI, TAU};

use macroquad::math::{vec2, Vec2};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::geometry::{rgb, shade, GeometryBuilder, TileFrame};

const TREES: usize = 5;
const CANOPY_WEDGES: usize = 7;

enum Crown {
    Pine { layers: Vec<f32> },
    Deciduous { width: f32 },
}

struct Tree {
    root: Vec2,
    trunk_height: f32,
    trunk_width: f32,
    crown: Crown,
    phase: f32,
    sway: f32,
}

enum Detail {
    Tuft { at: Vec2, size: f32, jitter: [f32; 3] },
    Plant { at: Vec2, size: f32 },
}

pub(super) fn build(frame: &TileFrame, phase: f32, rng: &mut ChaCha8Rng, out: &mut GeometryBuilder) {
    frame.outline(out, rgb(25, 60, 25));

    let scale = frame.scale();
    let details = ground_details(frame, rng);
    let mut trees = trees(frame, rng);
    // back to front
    trees.sort_by(|a, b| a.root.y.total_cmp(&b.root.y));

    let sway = phase.sin();
    let ground = rgb(50, 90, 30);
    for detail in &details {
        match *detail {
            Detail::Tuft { at, size, jitter } => {
                for (i, j) in jitter.iter().enumerate() {
                    let angle = PI + (i as f32 / 3.0) * PI + j + sway * 0.2;
                    let tip = at + vec2(angle.cos(), angle.sin()) * size;
                    out.line(at, tip, ground);
                }
            }
            Detail::Plant { at, size } => {
                let plant = shade(ground, 1.2);
                out.line(at - vec2(size, 0.0), at + vec2(size, 0.0), plant);
                out.line(at - vec2(0.0, size), at + vec2(0.0, size), plant);
            }
        }
    }

    let trunk = rgb(95, 65, 30);
    let foliage = rgb(40, 120, 40);
    for tree in &trees {
        let current = sway * tree.sway * (tree.phase + phase / 2.0).cos();
        let half = tree.trunk_width / 2.0;
        let top = tree.root + frame.up(tree.trunk_height);
        out.line(tree.root - vec2(half, 0.0), top - vec2(half, 0.0), trunk);
        out.line(tree.root + vec2(half, 0.0), top + vec2(half, 0.0), trunk);

        match &tree.crown {
            Crown::Pine { layers } => {
                let n = layers.len() as f32;
                for (i, &width) in layers.iter().enumerate() {
                    let base = top + frame.up(i as f32 * width * 0.8);
                    let shift = current * (i as f32 + 1.0) * 1.5 * scale;
                    let color = shade(foliage, 1.0 + (i as f32 / n) * 0.2);
                    out.polygon(
                        &[
                            base + vec2(-width / 2.0 + shift * 0.7, 0.0),
                            base + vec2(width / 2.0 + shift * 0.7, 0.0),
                            base + frame.up(width) + vec2(shift, 0.0),
                        ],
                        color,
                    );
                }
            }
            Crown::Deciduous { width } => {
                let radius = width / 2.0;
                let center = top + frame.up(width * 0.3);
                let shift = current * 3.0 * scale;
                let rim: Vec<Vec2> = (0..CANOPY_WEDGES)
                    .map(|i| {
                        let a = i as f32 / CANOPY_WEDGES as f32 * TAU;
                        // the crown's upper half moves most
                        center + vec2(a.cos() * radius - shift * a.sin(), a.sin() * radius)
                    })
                    .collect();
                for (i, p) in rim.iter().enumerate() {
                    let a = i as f32 / CANOPY_WEDGES as f32 * TAU;
                    out.line(center, *p, shade(foliage, 0.9 + 0.2 * a.sin()));
                }
                out.polygon(&rim, shade(foliage, 1.2));
            }
        }
    }
}

fn ground_details(frame: &TileFrame, rng: &mut ChaCha8Rng) -> Vec<Detail> {
    let count = rng.gen_range(10..=15);
    (0..count)
        .map(|_| {
            let at = frame.point(rng.gen_range(0.05..0.95), rng.gen_range(0.05..0.95));
            let size = rng.gen_range(1.0..3.0) * frame.scale();
            if rng.gen_bool(0.5) {
                let jitter = [
                    rng.gen_range(-0.2..0.2),
                    rng.gen_range(-0.2..0.2),
                    rng.gen_range(-0.2..0.2),
                ];
                Detail::Tuft { at, size, jitter }
            } else {
                Detail::Plant { at, size }
            }
        })
        .collect()
}

fn trees(frame: &TileFrame, rng: &mut ChaCha8Rng) -> Vec<Tree> {
    let scale = frame.scale();
    (0..TREES)
        .map(|_| {
            let root = frame.point(rng.gen_range(0.15..0.85), rng.gen_range(0.15..0.85));
            let trunk_height = rng.gen_range(10.0..20.0) * scale;
            let trunk_width = rng.gen_range(1.5..3.0) * scale;
            let crown = if rng.gen_bool(0.5) {
                let n = rng.gen_range(2..=4);
                let layers = (0..n)
                    .map(|i| {
                        let taper = 1.0 - (i as f32 / n as f32) * 0.5;
                        rng.gen_range(7.0..12.0) * taper * scale
                    })
                    .collect();
                Crown::Pine { layers }
            } else {
                Crown::Deciduous {
                    width: rng.gen_range(8.0..15.0) * scale,
                }
            };
            Tree {
                root,
                trunk_height,
                trunk_width,
                crown,
                phase: rng.gen_range(0.0..TAU),
                sway: rng.gen_range(0.8..1.2),
            }
        })
        .collect()
}
