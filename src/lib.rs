#![warn(missing_docs)]

//! Isometric vector-tile level renderer for Macroquad.
//!
//! Levels are grids of tile types across stacked layers. Every tile kind
//! draws itself as line art; geometry is generated once per
//! `(type, animation state)` and shared by every instance. The scene keeps
//! the realized set in sync with the camera incrementally, and each frame is
//! a single aggregated draw.

mod animation;
mod cache;
mod command;
mod config;
mod error;
mod geometry;
mod instance;
mod level;
/// Level parsers.
pub mod loader {
    /// JSON level documents.
    pub mod json_loader;
    /// `.mdmap` level text.
    pub mod mdmap;
    mod file;

    pub use file::load_level_file;
}
mod projection;
pub mod render;
mod renderer;
mod scene;
mod tiles;

pub use animation::{phase, state_at, AnimationClock, MAX_FRAME_TIME, MIN_FRAME_TIME};
pub use cache::GeometryCache;
pub use command::{CameraCommand, Direction};
pub use config::{AnimationConfig, RenderConfig};
pub use error::{ConfigError, LevelError, RenderError};
pub use geometry::{GeometryBuilder, TileFrame, VertexGeometry};
pub use instance::{DrawKey, TileInstance};
pub use level::{GridPosition, Level, LevelHeader, LevelLayer, TileTypeId};
pub use loader::load_level_file;
pub use projection::{to_grid, to_screen, IsoProjection, TILE_ASPECT};
pub use render::{BatchStats, DrawBatch, DrawableId, FrameState, HeadlessBatch, MeshBatch};
pub use renderer::IsoRenderer;
pub use scene::{Scene, SyncReport};
pub use tiles::{AnimationState, TileKind, TileRegistry};
