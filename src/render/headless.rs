// src/render/headless.rs
use std::rc::Rc;

use macroquad::math::Vec2;

use super::{DrawBatch, DrawableId, FrameState, Slots};
use crate::error::RenderError;
use crate::geometry::VertexGeometry;

/// Counters of every operation a [`HeadlessBatch`] has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Drawables created.
    pub creates: usize,
    /// Drawables destroyed.
    pub destroys: usize,
    /// Transform updates.
    pub moves: usize,
    /// Aggregated submissions.
    pub submits: usize,
    /// `begin` calls.
    pub begins: usize,
    /// `end` calls.
    pub ends: usize,
}

#[derive(Debug)]
struct Recorded {
    geometry: Rc<VertexGeometry>,
    origin: Vec2,
}

/// Backend without a window: keeps drawables in memory and records what the
/// composer asked for.
#[derive(Debug, Default)]
pub struct HeadlessBatch {
    drawables: Slots<Recorded>,
    stats: BatchStats,
    last_submit: Vec<DrawableId>,
    limit: Option<usize>,
    in_frame: bool,
}

impl HeadlessBatch {
    /// Unlimited backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that fails `create` once `limit` drawables are live.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Changes the live drawable limit.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
    }

    /// Operation counters.
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    /// Zeroes the counters.
    pub fn reset_stats(&mut self) {
        self.stats = BatchStats::default();
    }

    /// Ids of the most recent successful submission, in draw order.
    pub fn last_submit(&self) -> &[DrawableId] {
        &self.last_submit
    }

    /// Current origin of a live drawable.
    pub fn origin(&self, id: DrawableId) -> Option<Vec2> {
        self.drawables.get(id).map(|d| d.origin)
    }

    /// Geometry a live drawable was created with.
    pub fn geometry(&self, id: DrawableId) -> Option<&Rc<VertexGeometry>> {
        self.drawables.get(id).map(|d| &d.geometry)
    }
}

impl DrawBatch for HeadlessBatch {
    fn create(
        &mut self,
        geometry: Rc<VertexGeometry>,
        origin: Vec2,
    ) -> Result<DrawableId, RenderError> {
        if let Some(limit) = self.limit {
            if self.drawables.len() >= limit {
                return Err(RenderError::Resource(format!(
                    "drawable limit of {limit} reached"
                )));
            }
        }
        self.stats.creates += 1;
        Ok(self.drawables.insert(Recorded { geometry, origin }))
    }

    fn set_origin(&mut self, id: DrawableId, origin: Vec2) -> Result<(), RenderError> {
        let d = self
            .drawables
            .get_mut(id)
            .ok_or(RenderError::StaleDrawable(id))?;
        d.origin = origin;
        self.stats.moves += 1;
        Ok(())
    }

    fn destroy(&mut self, id: DrawableId) -> Result<(), RenderError> {
        self.drawables
            .remove(id)
            .ok_or(RenderError::StaleDrawable(id))?;
        self.stats.destroys += 1;
        Ok(())
    }

    fn begin(&mut self, _state: &FrameState) -> Result<(), RenderError> {
        self.in_frame = true;
        self.stats.begins += 1;
        Ok(())
    }

    fn submit(&mut self, order: &[DrawableId]) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::Resource("submit outside begin/end".into()));
        }
        if let Some(&stale) = order.iter().find(|id| !self.drawables.contains(**id)) {
            return Err(RenderError::StaleDrawable(stale));
        }
        self.last_submit.clear();
        self.last_submit.extend_from_slice(order);
        self.stats.submits += 1;
        Ok(())
    }

    fn end(&mut self) {
        self.in_frame = false;
        self.stats.ends += 1;
    }

    fn live(&self) -> usize {
        self.drawables.len()
    }
}
