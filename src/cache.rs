// src/cache.rs
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::error::RenderError;
use crate::geometry::{TileFrame, VertexGeometry};
use crate::level::TileTypeId;
use crate::tiles::{AnimationState, TileKind, TileRegistry};

/// Geometry for every `(tile type, animation state)` pair the loaded level
/// has asked for. Entries are built on first request and never edited.
#[derive(Debug)]
pub struct GeometryCache {
    registry: TileRegistry,
    frame: TileFrame,
    entries: HashMap<(TileTypeId, AnimationState), Rc<VertexGeometry>>,
    generation: u32,
    builds: u64,
}

impl GeometryCache {
    /// Creates an empty cache generating tiles in `frame`.
    pub fn new(registry: TileRegistry, frame: TileFrame) -> Self {
        Self {
            registry,
            frame,
            entries: HashMap::new(),
            generation: 0,
            builds: 0,
        }
    }

    /// Returns the shared geometry for `(type_id, state)`, generating it on
    /// the first request.
    pub fn get_or_build(
        &mut self,
        type_id: TileTypeId,
        state: AnimationState,
    ) -> Result<Rc<VertexGeometry>, RenderError> {
        if let Some(geometry) = self.entries.get(&(type_id, state)) {
            return Ok(Rc::clone(geometry));
        }

        let kind = self.kind(type_id)?;
        let count = kind.state_count();
        if state.0 >= count {
            return Err(RenderError::InvalidAnimationState {
                type_id,
                state: state.0,
                count,
            });
        }

        let geometry = Rc::new(kind.build(&self.frame, state));
        self.builds += 1;
        debug!(
            %type_id,
            kind = kind.name(),
            %state,
            segments = geometry.segment_count(),
            "built tile geometry"
        );
        self.entries.insert((type_id, state), Rc::clone(&geometry));
        Ok(geometry)
    }

    /// Number of animation states of `type_id`'s kind.
    pub fn state_count(&self, type_id: TileTypeId) -> Result<u8, RenderError> {
        Ok(self.kind(type_id)?.state_count())
    }

    fn kind(&self, type_id: TileTypeId) -> Result<TileKind, RenderError> {
        self.registry
            .kind(type_id)
            .ok_or(RenderError::UnknownTileType(type_id))
    }

    /// Drops every entry. Callers must have released all instances first.
    pub fn clear(&mut self) {
        debug!(
            entries = self.entries.len(),
            generation = self.generation,
            "clearing geometry cache"
        );
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Bumped on every [`GeometryCache::clear`].
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Number of cached pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total geometry generations since construction.
    pub fn builds(&self) -> u64 {
        self.builds
    }

    /// Tile kinds known to this cache.
    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    /// Tile-local frame the geometry is generated in.
    pub fn frame(&self) -> TileFrame {
        self.frame
    }
}
