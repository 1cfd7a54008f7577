// src/render/mesh_batch.rs
use std::rc::Rc;

use macroquad::color::Color;
use macroquad::material::{
    gl_use_default_material, gl_use_material, load_material, Material, MaterialParams,
};
use macroquad::math::{vec2, Vec2};
use macroquad::miniquad::{BlendFactor, BlendState, BlendValue, Equation, PipelineParams, ShaderSource};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use tracing::trace;

use super::{DrawBatch, DrawableId, FrameState, Slots};
use crate::error::RenderError;
use crate::geometry::VertexGeometry;

// Macroquad's default batcher accepts 5000 indices per draw; a segment quad
// takes 6.
const SEGMENTS_PER_FLUSH: usize = 800;

const LINE_VERTEX: &str = r#"#version 100
attribute vec3 position;
attribute vec2 texcoord;
attribute vec4 color0;

varying lowp vec4 color;

uniform mat4 Model;
uniform mat4 Projection;

void main() {
    gl_Position = Projection * Model * vec4(position, 1);
    color = color0 / 255.0;
}
"#;

const LINE_FRAGMENT: &str = r#"#version 100
varying lowp vec4 color;

void main() {
    gl_FragColor = color;
}
"#;

#[derive(Debug)]
struct Placed {
    geometry: Rc<VertexGeometry>,
    origin: Vec2,
}

/// Macroquad backend: expands every segment into a thick-line quad and
/// streams the whole frame through one reused [`Mesh`].
pub struct MeshBatch {
    drawables: Slots<Placed>,
    mesh: Mesh,
    material: Material,
    half_width: f32,
}

impl MeshBatch {
    /// Compiles the line material. Needs a live Macroquad context.
    pub fn new() -> Result<Self, RenderError> {
        let material = load_material(
            ShaderSource::Glsl {
                vertex: LINE_VERTEX,
                fragment: LINE_FRAGMENT,
            },
            MaterialParams {
                pipeline_params: PipelineParams {
                    color_blend: Some(BlendState::new(
                        Equation::Add,
                        BlendFactor::Value(BlendValue::SourceAlpha),
                        BlendFactor::OneMinusValue(BlendValue::SourceAlpha),
                    )),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .map_err(|e| RenderError::Resource(format!("line material: {e:?}")))?;

        Ok(Self {
            drawables: Slots::new(),
            mesh: Mesh {
                vertices: Vec::with_capacity(SEGMENTS_PER_FLUSH * 4),
                indices: Vec::with_capacity(SEGMENTS_PER_FLUSH * 6),
                texture: None,
            },
            material,
            half_width: 0.5,
        })
    }

    fn push_segment(&mut self, a: Vec2, ca: Color, b: Vec2, cb: Color) {
        let dir = b - a;
        let len = dir.length();
        if len <= f32::EPSILON {
            return;
        }
        let n = vec2(-dir.y, dir.x) / len * self.half_width;
        let base = self.mesh.vertices.len() as u16;
        self.mesh.vertices.extend_from_slice(&[
            Vertex::new(a.x + n.x, a.y + n.y, 0.0, 0.0, 0.0, ca),
            Vertex::new(a.x - n.x, a.y - n.y, 0.0, 0.0, 0.0, ca),
            Vertex::new(b.x - n.x, b.y - n.y, 0.0, 0.0, 0.0, cb),
            Vertex::new(b.x + n.x, b.y + n.y, 0.0, 0.0, 0.0, cb),
        ]);
        self.mesh
            .indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        if self.mesh.indices.len() >= SEGMENTS_PER_FLUSH * 6 {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.mesh.indices.is_empty() {
            return;
        }
        draw_mesh(&self.mesh);
        self.mesh.vertices.clear();
        self.mesh.indices.clear();
    }
}

impl DrawBatch for MeshBatch {
    fn create(
        &mut self,
        geometry: Rc<VertexGeometry>,
        origin: Vec2,
    ) -> Result<DrawableId, RenderError> {
        Ok(self.drawables.insert(Placed { geometry, origin }))
    }

    fn set_origin(&mut self, id: DrawableId, origin: Vec2) -> Result<(), RenderError> {
        let placed = self
            .drawables
            .get_mut(id)
            .ok_or(RenderError::StaleDrawable(id))?;
        placed.origin = origin;
        Ok(())
    }

    fn destroy(&mut self, id: DrawableId) -> Result<(), RenderError> {
        self.drawables
            .remove(id)
            .map(drop)
            .ok_or(RenderError::StaleDrawable(id))
    }

    fn begin(&mut self, state: &FrameState) -> Result<(), RenderError> {
        self.half_width = state.line_width.max(0.1) / 2.0;
        gl_use_material(&self.material);
        Ok(())
    }

    fn submit(&mut self, order: &[DrawableId]) -> Result<(), RenderError> {
        if let Some(&stale) = order.iter().find(|id| !self.drawables.contains(**id)) {
            return Err(RenderError::StaleDrawable(stale));
        }

        let mut segments = 0usize;
        for &id in order {
            let Some(placed) = self.drawables.get(id) else {
                continue;
            };
            let geometry = Rc::clone(&placed.geometry);
            let origin = placed.origin;
            for ((a, ca), (b, cb)) in geometry.segments() {
                self.push_segment(a + origin, ca, b + origin, cb);
                segments += 1;
            }
        }
        self.flush();
        trace!(drawables = order.len(), segments, "submitted frame");
        Ok(())
    }

    fn end(&mut self) {
        gl_use_default_material();
    }

    fn live(&self) -> usize {
        self.drawables.len()
    }
}
