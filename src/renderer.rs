//! Frame submission and the renderer's public entry points.

use macroquad::math::Vec2;
use tracing::{debug, warn};

use crate::cache::GeometryCache;
use crate::command::CameraCommand;
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::geometry::TileFrame;
use crate::level::{Level, TileTypeId};
use crate::render::{DrawBatch, DrawableId, FrameState};
use crate::scene::{sanitize_viewport, Scene, SyncReport};
use crate::tiles::TileRegistry;

/// Owns the geometry cache, the draw backend and the loaded scene.
///
/// The host loop feeds input through the entry points and calls
/// [`IsoRenderer::render_frame`] once per frame; nothing here polls time or
/// input on its own.
pub struct IsoRenderer<B: DrawBatch> {
    config: RenderConfig,
    cache: GeometryCache,
    batch: B,
    scene: Option<Scene>,
    viewport: Vec2,
    queued: Vec<CameraCommand>,
    order: Vec<DrawableId>,
    last_report: SyncReport,
}

impl<B: DrawBatch> IsoRenderer<B> {
    /// Renderer with no level loaded.
    pub fn new(config: RenderConfig, registry: TileRegistry, batch: B, viewport: Vec2) -> Self {
        let config = config.sanitized();
        let frame = TileFrame::new(config.tile_width, config.tile_height());
        Self {
            cache: GeometryCache::new(registry, frame),
            config,
            batch,
            scene: None,
            viewport: sanitize_viewport(viewport.x, viewport.y),
            queued: Vec::new(),
            order: Vec::new(),
            last_report: SyncReport::default(),
        }
    }

    /// Replaces the current level. The old scene releases its drawables and
    /// the cache is emptied before the new scene exists.
    pub fn load_level(&mut self, level: Level) {
        if let Err(err) = self.unload_level() {
            warn!(%err, "previous level did not release cleanly");
        }
        debug!(
            level = level.name(),
            width = level.width(),
            height = level.height(),
            layers = level.layers().len(),
            "loading level"
        );
        self.scene = Some(Scene::new(level, &self.config, self.viewport));
    }

    /// Drops the current scene and every cached geometry.
    pub fn unload_level(&mut self) -> Result<(), RenderError> {
        self.queued.clear();
        self.order.clear();
        let released = match self.scene.take() {
            Some(mut scene) => {
                debug!(level = scene.level().name(), "unloading level");
                scene.teardown(&mut self.batch)
            }
            None => Ok(()),
        };
        self.cache.clear();
        released
    }

    /// Moves the camera by `(dx, dy)` pixels, after any queued commands.
    pub fn set_offset(&mut self, dx: f32, dy: f32) {
        if let Some(scene) = self.drain_queued() {
            scene.pan(dx, dy);
        }
    }

    /// Centres the map in the viewport, after any queued commands.
    pub fn reset_offset(&mut self) {
        if let Some(scene) = self.drain_queued() {
            scene.reset_camera();
        }
    }

    /// Applies a camera command right away. Commands queued earlier are
    /// applied first, so delivery order is preserved.
    pub fn apply(&mut self, command: CameraCommand) {
        let pan_step = self.config.pan_step;
        if let Some(scene) = self.drain_queued() {
            apply_command(scene, command, pan_step);
        }
    }

    /// Queues a camera command; the queue drains at the start of the next
    /// [`IsoRenderer::render_frame`] or before the next immediate camera call.
    pub fn queue(&mut self, command: CameraCommand) {
        self.queued.push(command);
    }

    /// Updates the viewport size and re-centres the map in it.
    pub fn resize(&mut self, width: f32, height: f32) {
        let previous = self.viewport;
        self.viewport = match self.drain_queued() {
            Some(scene) => {
                scene.resize(width, height);
                if scene.viewport() != previous {
                    scene.reset_camera();
                }
                scene.viewport()
            }
            None => sanitize_viewport(width, height),
        };
    }

    /// Feeds elapsed seconds to the animation clock.
    pub fn advance_time(&mut self, delta: f32) {
        if let Some(scene) = self.scene.as_mut() {
            scene.advance_time(delta);
        }
    }

    /// Edits one cell of the loaded level.
    pub fn set_tile(
        &mut self,
        layer: usize,
        x: u32,
        y: u32,
        tile: Option<TileTypeId>,
    ) -> Result<(), RenderError> {
        self.scene
            .as_mut()
            .ok_or(RenderError::NoLevel)?
            .set_tile(layer, x, y, tile)
    }

    /// Pauses or resumes animation; carried over to later levels.
    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.config.animation.enabled = enabled;
        if let Some(scene) = self.scene.as_mut() {
            scene.set_animation_enabled(enabled);
        }
    }

    /// Sets seconds per animation tick, clamped to the supported range.
    pub fn set_animation_speed(&mut self, frame_time: f32) {
        self.config.animation.frame_time = crate::animation::clamp_frame_time(frame_time);
        if let Some(scene) = self.scene.as_mut() {
            scene.set_animation_frame_time(frame_time);
        }
    }

    /// Resolves all pending changes, then draws every realized tile in one
    /// submission between a single `begin`/`end` pair.
    ///
    /// A sync failure returns before anything is drawn.
    pub fn render_frame(&mut self) -> Result<(), RenderError> {
        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };

        for command in self.queued.drain(..) {
            apply_command(scene, command, self.config.pan_step);
        }
        self.last_report = scene.sync(&mut self.cache, &mut self.batch)?;
        scene.draw_list(&mut self.order);

        let state = FrameState {
            line_width: self.config.line_width,
            viewport: scene.viewport(),
        };
        self.batch.begin(&state)?;
        let submitted = self.batch.submit(&self.order);
        self.batch.end();
        submitted
    }

    // Applies queued commands in delivery order and hands back the scene.
    fn drain_queued(&mut self) -> Option<&mut Scene> {
        let scene = self.scene.as_mut()?;
        for command in self.queued.drain(..) {
            apply_command(scene, command, self.config.pan_step);
        }
        Some(scene)
    }

    /// The loaded scene.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Geometry cache.
    pub fn cache(&self) -> &GeometryCache {
        &self.cache
    }

    /// Draw backend.
    pub fn batch(&self) -> &B {
        &self.batch
    }

    /// Mutable draw backend.
    pub fn batch_mut(&mut self) -> &mut B {
        &mut self.batch
    }

    /// Active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Whether animation is running.
    pub fn animation_enabled(&self) -> bool {
        self.config.animation.enabled
    }

    /// Seconds per animation tick.
    pub fn animation_speed(&self) -> f32 {
        self.config.animation.frame_time
    }

    /// What the last successful sync did.
    pub fn last_report(&self) -> SyncReport {
        self.last_report
    }
}

fn apply_command(scene: &mut Scene, command: CameraCommand, pan_step: f32) {
    match command {
        CameraCommand::Pan(direction) => {
            let delta = direction.offset_delta(pan_step);
            scene.pan(delta.x, delta.y);
        }
        CameraCommand::Reset => scene.reset_camera(),
    }
}
