//! Scene composer.
//!
//! A [`Scene`] owns the level data, the camera and every realized
//! [`TileInstance`]. Entry points only record what changed; [`Scene::sync`]
//! applies the pending work against a [`DrawBatch`] in three passes:
//!
//! 1. culling and positions: cells leaving the view are destroyed, survivors
//!    get one transform update, cells entering the view are created;
//! 2. tile edits: cells whose tile type changed swap their drawable;
//! 3. animation: cells whose animation state advanced swap their drawable.
//!
//! Camera movement never destroys or recreates a drawable that stays in view.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use macroquad::math::{vec2, Vec2};
use tracing::{debug, trace, warn};

use crate::animation::{state_at, AnimationClock};
use crate::cache::GeometryCache;
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::instance::{DrawKey, TileInstance};
use crate::level::{GridPosition, Level, TileTypeId};
use crate::projection::IsoProjection;
use crate::render::cull::{self, CellRange};
use crate::render::{DrawBatch, DrawableId};

/// What one [`Scene::sync`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Drawables created for cells entering the view or gaining a tile.
    pub created: usize,
    /// Drawables destroyed for cells leaving the view or losing their tile.
    pub destroyed: usize,
    /// Transform-only updates.
    pub moved: usize,
    /// Destroy + create pairs for type or animation changes.
    pub swapped: usize,
    /// Instances realized after the sync.
    pub realized: usize,
}

impl SyncReport {
    /// `true` when the sync touched no drawable.
    pub fn is_idle(&self) -> bool {
        self.created == 0 && self.destroyed == 0 && self.moved == 0 && self.swapped == 0
    }
}

/// Level, camera and live instances of one loaded level.
#[derive(Debug)]
pub struct Scene {
    level: Level,
    projection: IsoProjection,
    viewport: Vec2,
    cull_margin: f32,
    offset: Vec2,
    clock: AnimationClock,
    instances: BTreeMap<DrawKey, TileInstance>,
    // row-major, one flag per cell, result of the last cull
    visible: Vec<bool>,
    candidates: Option<CellRange>,
    edits: BTreeSet<DrawKey>,
    synced_tick: u64,
    moved: bool,
    recull: bool,
    scratch: Vec<DrawKey>,
}

impl Scene {
    /// Builds a scene with the map centred in `viewport`. Nothing is realized
    /// until the first [`Scene::sync`].
    pub fn new(level: Level, config: &RenderConfig, viewport: Vec2) -> Self {
        let cells = level.width() as usize * level.height() as usize;
        let mut scene = Self {
            projection: IsoProjection::new(config.tile_width),
            viewport: sanitize_viewport(viewport.x, viewport.y),
            cull_margin: config.cull_margin.max(0.0),
            offset: Vec2::ZERO,
            clock: AnimationClock::new(config.animation.enabled, config.animation.frame_time),
            instances: BTreeMap::new(),
            visible: vec![false; cells],
            candidates: None,
            edits: BTreeSet::new(),
            synced_tick: 0,
            moved: false,
            recull: true,
            scratch: Vec::new(),
            level,
        };
        scene.offset = scene.centered_offset();
        scene
    }

    // ---- entry points -------------------------------------------------

    /// Moves the camera by `(dx, dy)` pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let delta = vec2(finite_or_zero(dx, "dx"), finite_or_zero(dy, "dy"));
        if delta != Vec2::ZERO {
            self.set_camera(self.offset + delta);
        }
    }

    /// Places the camera at an absolute offset.
    pub fn set_camera(&mut self, offset: Vec2) {
        if !offset.is_finite() {
            warn!(?offset, "ignoring non-finite camera offset");
            return;
        }
        if offset != self.offset {
            self.offset = offset;
            self.moved = true;
        }
    }

    /// Centres the map in the viewport.
    pub fn reset_camera(&mut self) {
        let centred = self.centered_offset();
        self.set_camera(centred);
    }

    /// Changes the viewport size. Invalid sizes are clamped to zero.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = sanitize_viewport(width, height);
        if viewport != self.viewport {
            self.viewport = viewport;
            self.recull = true;
        }
    }

    /// Feeds elapsed seconds to the animation clock. Returns `true` when the
    /// animation tick advanced.
    pub fn advance_time(&mut self, delta: f32) -> bool {
        self.clock.advance(delta)
    }

    /// Replaces one cell; the drawable is swapped on the next sync.
    pub fn set_tile(
        &mut self,
        layer: usize,
        x: u32,
        y: u32,
        tile: Option<TileTypeId>,
    ) -> Result<(), RenderError> {
        if !self.level.set_tile(layer, x, y, tile) {
            return Err(RenderError::CellOutOfBounds { layer, x, y });
        }
        self.edits.insert(DrawKey::new(layer, x, y));
        Ok(())
    }

    /// Pauses or resumes animation.
    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.clock.set_enabled(enabled);
    }

    /// Seconds per animation tick.
    pub fn set_animation_frame_time(&mut self, secs: f32) {
        self.clock.set_frame_time(secs);
    }

    // ---- sync ---------------------------------------------------------

    /// Applies every pending change to `batch`.
    ///
    /// On error the scene stays consistent: instances whose drawable could
    /// not be created are dropped and the next sync retries them.
    pub fn sync<B: DrawBatch + ?Sized>(
        &mut self,
        cache: &mut GeometryCache,
        batch: &mut B,
    ) -> Result<SyncReport, RenderError> {
        let mut report = SyncReport::default();
        let result = self.apply_pending(cache, batch, &mut report);
        report.realized = self.instances.len();
        if let Err(err) = result {
            self.recull = true;
            warn!(%err, ?report, "scene sync failed");
            return Err(err);
        }
        if !report.is_idle() {
            debug!(
                created = report.created,
                destroyed = report.destroyed,
                moved = report.moved,
                swapped = report.swapped,
                realized = report.realized,
                "scene synced"
            );
        }
        Ok(report)
    }

    fn apply_pending<B: DrawBatch + ?Sized>(
        &mut self,
        cache: &mut GeometryCache,
        batch: &mut B,
        report: &mut SyncReport,
    ) -> Result<(), RenderError> {
        if self.moved || self.recull {
            self.cull_pass(cache, batch, report)?;
        }
        if !self.edits.is_empty() {
            self.edit_pass(cache, batch, report)?;
        }
        if self.clock.tick() != self.synced_tick {
            self.animation_pass(cache, batch, report)?;
        }
        Ok(())
    }

    fn cull_pass<B: DrawBatch + ?Sized>(
        &mut self,
        cache: &mut GeometryCache,
        batch: &mut B,
        report: &mut SyncReport,
    ) -> Result<(), RenderError> {
        self.compute_visibility();

        let mut leaving = std::mem::take(&mut self.scratch);
        leaving.clear();
        leaving.extend(
            self.instances
                .keys()
                .filter(|k| !self.visible[cell_index(self.level.width(), k.x, k.y)])
                .copied(),
        );
        let mut result = Ok(());
        for &key in &leaving {
            if let Err(err) = self.release(key, batch) {
                result = Err(err);
                break;
            }
            report.destroyed += 1;
        }
        self.scratch = leaving;
        result?;

        if self.moved {
            for inst in self.instances.values_mut() {
                let screen = self.projection.cell_to_screen(inst.key.position(), self.offset);
                batch.set_origin(inst.drawable, screen)?;
                inst.screen = screen;
                report.moved += 1;
            }
        }

        if let Some(range) = self.candidates {
            let layers = self.level.layers().len();
            for (x, y) in range.cells() {
                if !self.visible[cell_index(self.level.width(), x, y)] {
                    continue;
                }
                for layer in 0..layers {
                    let key = DrawKey::new(layer, x, y);
                    let Some(type_id) = self.level.tile(layer, x, y) else {
                        continue;
                    };
                    if !self.instances.contains_key(&key) {
                        self.realize(key, type_id, cache, batch)?;
                        report.created += 1;
                    }
                }
            }
        }

        self.moved = false;
        self.recull = false;
        Ok(())
    }

    fn edit_pass<B: DrawBatch + ?Sized>(
        &mut self,
        cache: &mut GeometryCache,
        batch: &mut B,
        report: &mut SyncReport,
    ) -> Result<(), RenderError> {
        // an edit stays pending until it has been applied
        while let Some(&key) = self.edits.first() {
            let wanted = if self.is_visible(key.x, key.y) {
                self.level.tile(key.layer, key.x, key.y)
            } else {
                None
            };
            let current = self.instances.get(&key).map(|i| i.type_id);
            match (current, wanted) {
                (Some(have), Some(want)) if have == want => {}
                (Some(_), Some(want)) => {
                    self.release(key, batch)?;
                    self.realize(key, want, cache, batch)?;
                    report.swapped += 1;
                }
                (Some(_), None) => {
                    self.release(key, batch)?;
                    report.destroyed += 1;
                }
                (None, Some(want)) => {
                    self.realize(key, want, cache, batch)?;
                    report.created += 1;
                }
                (None, None) => {}
            }
            self.edits.remove(&key);
        }
        Ok(())
    }

    fn animation_pass<B: DrawBatch + ?Sized>(
        &mut self,
        cache: &mut GeometryCache,
        batch: &mut B,
        report: &mut SyncReport,
    ) -> Result<(), RenderError> {
        let tick = self.clock.tick();
        let mut changed = std::mem::take(&mut self.scratch);
        changed.clear();

        let mut result = Ok(());
        for inst in self.instances.values() {
            match cache.state_count(inst.type_id) {
                Ok(count) => {
                    if state_at(tick, inst.key.position(), count) != inst.state {
                        changed.push(inst.key);
                    }
                }
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }
        if result.is_ok() {
            for &key in &changed {
                if let Err(err) = self.swap(key, cache, batch) {
                    result = Err(err);
                    break;
                }
                report.swapped += 1;
            }
        }
        self.scratch = changed;
        result?;

        self.synced_tick = tick;
        Ok(())
    }

    // Replaces the drawable of a realized cell with one for its current state.
    fn swap<B: DrawBatch + ?Sized>(
        &mut self,
        key: DrawKey,
        cache: &mut GeometryCache,
        batch: &mut B,
    ) -> Result<(), RenderError> {
        let Some(type_id) = self.instances.get(&key).map(|i| i.type_id) else {
            return Ok(());
        };
        self.release(key, batch)?;
        self.realize(key, type_id, cache, batch)
    }

    // Looks up geometry for the cell's current animation state and attaches
    // it at the cell's projected position.
    fn realize<B: DrawBatch + ?Sized>(
        &mut self,
        key: DrawKey,
        type_id: TileTypeId,
        cache: &mut GeometryCache,
        batch: &mut B,
    ) -> Result<(), RenderError> {
        let count = cache.state_count(type_id)?;
        let state = state_at(self.clock.tick(), key.position(), count);
        let geometry = cache.get_or_build(type_id, state)?;
        let screen = self.projection.cell_to_screen(key.position(), self.offset);
        let drawable = batch.create(Rc::clone(&geometry), screen)?;
        trace!(?key, %type_id, %state, %drawable, "realized");
        self.instances.insert(
            key,
            TileInstance {
                key,
                type_id,
                state,
                geometry,
                drawable,
                screen,
            },
        );
        Ok(())
    }

    fn release<B: DrawBatch + ?Sized>(
        &mut self,
        key: DrawKey,
        batch: &mut B,
    ) -> Result<(), RenderError> {
        // the instance keeps owning its drawable until the backend lets go
        if let Some(drawable) = self.instances.get(&key).map(|i| i.drawable) {
            batch.destroy(drawable)?;
            self.instances.remove(&key);
            trace!(?key, %drawable, "released");
        }
        Ok(())
    }

    fn compute_visibility(&mut self) {
        self.visible.fill(false);
        let (view_min, view_max) = cull::view_rect(self.viewport, self.cull_margin);
        self.candidates = cull::candidate_cells(
            &self.projection,
            self.offset,
            view_min,
            view_max,
            self.level.width(),
            self.level.height(),
        );
        let Some(range) = self.candidates else {
            return;
        };
        let width = self.level.width();
        for (x, y) in range.cells() {
            let anchor = self
                .projection
                .cell_to_screen(GridPosition::new(x, y), self.offset);
            if cull::tile_visible(&self.projection, anchor, view_min, view_max) {
                self.visible[cell_index(width, x, y)] = true;
            }
        }
    }

    /// Destroys every drawable. The scene can be synced again afterwards.
    /// Instances whose drawable the backend refused to destroy are kept so a
    /// later teardown can retry them.
    pub fn teardown<B: DrawBatch + ?Sized>(&mut self, batch: &mut B) -> Result<(), RenderError> {
        let mut first_err = None;
        let count = self.instances.len();
        for (key, inst) in std::mem::take(&mut self.instances) {
            if let Err(err) = batch.destroy(inst.drawable) {
                first_err.get_or_insert(err);
                self.instances.insert(key, inst);
            }
        }
        if !self.instances.is_empty() {
            warn!(kept = self.instances.len(), "drawables survived teardown");
        }
        self.edits.clear();
        self.visible.fill(false);
        self.candidates = None;
        self.synced_tick = self.clock.tick();
        self.recull = true;
        debug!(level = self.level.name(), instances = count, "scene torn down");
        first_err.map_or(Ok(()), Err)
    }

    // ---- accessors ----------------------------------------------------

    /// Level data, including edits made through [`Scene::set_tile`].
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Current camera offset.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Current viewport size.
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Projection used for every instance.
    pub fn projection(&self) -> &IsoProjection {
        &self.projection
    }

    /// Animation clock.
    pub fn animation(&self) -> &AnimationClock {
        &self.clock
    }

    /// Realized instances in painter's order.
    pub fn instances(&self) -> impl Iterator<Item = &TileInstance> + '_ {
        self.instances.values()
    }

    /// Instance of one cell, if realized.
    pub fn instance(&self, layer: usize, x: u32, y: u32) -> Option<&TileInstance> {
        self.instances.get(&DrawKey::new(layer, x, y))
    }

    /// Number of realized instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// `true` when nothing is realized.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Whether the last cull found the cell inside the view.
    pub fn is_visible(&self, x: u32, y: u32) -> bool {
        x < self.level.width()
            && y < self.level.height()
            && self.visible[cell_index(self.level.width(), x, y)]
    }

    /// `true` when a sync would do work.
    pub fn is_dirty(&self) -> bool {
        self.moved || self.recull || !self.edits.is_empty() || self.clock.tick() != self.synced_tick
    }

    /// Fills `out` with every drawable in painter's order.
    pub fn draw_list(&self, out: &mut Vec<DrawableId>) {
        out.clear();
        out.extend(self.instances.values().map(|i| i.drawable));
    }

    fn centered_offset(&self) -> Vec2 {
        let center = vec2(self.level.width() as f32, self.level.height() as f32) / 2.0;
        self.viewport / 2.0 - self.projection.to_screen(center, Vec2::ZERO)
    }
}

#[inline]
fn cell_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

fn finite_or_zero(v: f32, what: &'static str) -> f32 {
    if v.is_finite() {
        v
    } else {
        warn!(value = v, what, "ignoring non-finite camera delta");
        0.0
    }
}

pub(crate) fn sanitize_viewport(width: f32, height: f32) -> Vec2 {
    let clamp = |v: f32, what: &'static str| {
        if v.is_finite() && v >= 0.0 {
            v
        } else {
            warn!(value = v, what, "viewport size out of range, clamping");
            0.0
        }
    };
    vec2(clamp(width, "width"), clamp(height, "height"))
}
