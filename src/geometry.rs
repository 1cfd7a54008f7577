// src/geometry.rs
//
// Line-list geometry in tile-local coordinates. The origin is the top corner
// of the tile diamond and y grows downward, matching `projection`.

use macroquad::color::Color;
use macroquad::math::{vec2, Vec2};

/// Immutable line list: `positions[2i]..positions[2i + 1]` is one segment,
/// `colors[i]` colours `positions[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexGeometry {
    positions: Vec<Vec2>,
    colors: Vec<Color>,
    min: Vec2,
    max: Vec2,
}

impl VertexGeometry {
    /// Segment endpoints, two per segment.
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Per-vertex colours.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    /// `true` when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Segments as `((start, start_color), (end, end_color))`.
    pub fn segments(&self) -> impl Iterator<Item = ((Vec2, Color), (Vec2, Color))> + '_ {
        self.positions
            .chunks_exact(2)
            .zip(self.colors.chunks_exact(2))
            .map(|(p, c)| ((p[0], c[0]), (p[1], c[1])))
    }

    /// Local bounding box `(min, max)`; decorations may extend above the diamond.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.min, self.max)
    }
}

/// Accumulates line segments for one [`VertexGeometry`].
#[derive(Debug, Default)]
pub struct GeometryBuilder {
    positions: Vec<Vec2>,
    colors: Vec<Color>,
}

impl GeometryBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Solid segment from `a` to `b`.
    pub fn line(&mut self, a: Vec2, b: Vec2, color: Color) -> &mut Self {
        self.gradient_line(a, b, color, color)
    }

    /// Segment blending from `ca` at `a` to `cb` at `b`.
    pub fn gradient_line(&mut self, a: Vec2, b: Vec2, ca: Color, cb: Color) -> &mut Self {
        self.positions.extend_from_slice(&[a, b]);
        self.colors.extend_from_slice(&[ca, cb]);
        self
    }

    /// Open polyline through `points`.
    pub fn polyline(&mut self, points: &[Vec2], color: Color) -> &mut Self {
        for w in points.windows(2) {
            self.line(w[0], w[1], color);
        }
        self
    }

    /// Closed outline through `points`.
    pub fn polygon(&mut self, points: &[Vec2], color: Color) -> &mut Self {
        self.polyline(points, color);
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if points.len() > 2 {
                self.line(last, first, color);
            }
        }
        self
    }

    /// Freezes the segments and computes their bounds.
    pub fn build(self) -> VertexGeometry {
        let (min, max) = self.positions.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        let (min, max) = if self.positions.is_empty() {
            (Vec2::ZERO, Vec2::ZERO)
        } else {
            (min, max)
        };
        VertexGeometry {
            positions: self.positions,
            colors: self.colors,
            min,
            max,
        }
    }
}

/// Tile-local frame of one diamond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileFrame {
    /// Diamond width in pixels.
    pub width: f32,
    /// Diamond height in pixels.
    pub height: f32,
}

impl TileFrame {
    /// Frame for a `width` x `height` diamond.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Maps the unit square onto the diamond: `(0, 0)` is the top corner,
    /// `(1, 0)` the right corner, `(0, 1)` the left and `(1, 1)` the bottom.
    #[inline]
    pub fn point(&self, u: f32, v: f32) -> Vec2 {
        vec2((u - v) * self.width / 2.0, (u + v) * self.height / 2.0)
    }

    /// Centre of the diamond.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.point(0.5, 0.5)
    }

    /// Vertical offset for strokes that rise off the ground plane.
    #[inline]
    pub fn up(&self, px: f32) -> Vec2 {
        vec2(0.0, -px)
    }

    /// Pixels per unit of the 100x50 reference tile.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.width / 100.0
    }

    /// Top, right, bottom and left corners, clockwise.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.point(0.0, 0.0),
            self.point(1.0, 0.0),
            self.point(1.0, 1.0),
            self.point(0.0, 1.0),
        ]
    }

    /// Adds the diamond outline to `out`.
    pub fn outline(&self, out: &mut GeometryBuilder, color: Color) {
        out.polygon(&self.corners(), color);
    }
}

#[inline]
pub fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgba(r, g, b, 255)
}

/// Scales the RGB channels of `c`, clamped to 1.0.
pub fn shade(c: Color, factor: f32) -> Color {
    Color::new(
        (c.r * factor).min(1.0),
        (c.g * factor).min(1.0),
        (c.b * factor).min(1.0),
        c.a,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::prelude::WHITE;

    #[test]
    fn diamond_outline_is_four_segments() {
        let frame = TileFrame::new(128.0, 64.0);
        let mut b = GeometryBuilder::new();
        frame.outline(&mut b, WHITE);
        let g = b.build();
        assert_eq!(g.segment_count(), 4);
        assert_eq!(g.bounds(), (vec2(-64.0, 0.0), vec2(64.0, 64.0)));
    }

    #[test]
    fn frame_corners_match_projection() {
        let frame = TileFrame::new(100.0, 50.0);
        assert_eq!(frame.point(1.0, 0.0), vec2(50.0, 25.0));
        assert_eq!(frame.point(0.0, 1.0), vec2(-50.0, 25.0));
        assert_eq!(frame.center(), vec2(0.0, 25.0));
    }

    #[test]
    fn empty_geometry_has_zero_bounds() {
        let g = GeometryBuilder::new().build();
        assert!(g.is_empty());
        assert_eq!(g.bounds(), (Vec2::ZERO, Vec2::ZERO));
    }
}
