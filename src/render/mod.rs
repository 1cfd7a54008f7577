//! Draw backends.
//!
//! A backend owns one drawable per realized tile. The scene composer only
//! ever creates, moves and destroys drawables; a frame is one `begin`, one
//! `submit` covering every drawable in painter's order, and one `end`.

use std::rc::Rc;

use macroquad::math::Vec2;

use crate::error::RenderError;
use crate::geometry::VertexGeometry;

/// Viewport culling math.
pub mod cull;
mod headless;
mod mesh_batch;
mod slots;

pub use headless::{BatchStats, HeadlessBatch};
pub use mesh_batch::MeshBatch;
pub use slots::DrawableId;
pub(crate) use slots::Slots;

/// Render state applied once around the aggregated draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Stroke width in pixels.
    pub line_width: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
}

/// GPU-side store of positioned tile geometry.
pub trait DrawBatch {
    /// Attaches `geometry` at screen position `origin`.
    fn create(
        &mut self,
        geometry: Rc<VertexGeometry>,
        origin: Vec2,
    ) -> Result<DrawableId, RenderError>;

    /// Moves a drawable without touching its geometry.
    fn set_origin(&mut self, id: DrawableId, origin: Vec2) -> Result<(), RenderError>;

    /// Releases a drawable.
    fn destroy(&mut self, id: DrawableId) -> Result<(), RenderError>;

    /// Binds render state for the frame.
    fn begin(&mut self, state: &FrameState) -> Result<(), RenderError>;

    /// Draws `order` front to back of the list, later ids on top. Every id is
    /// validated before anything is drawn.
    fn submit(&mut self, order: &[DrawableId]) -> Result<(), RenderError>;

    /// Restores render state changed by `begin`.
    fn end(&mut self);

    /// Number of live drawables.
    fn live(&self) -> usize;
}
