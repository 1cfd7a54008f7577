// src/level.rs
use std::fmt;

use crate::error::LevelError;

/// Identifier of a tile kind, resolved from a legend symbol while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileTypeId(pub u16);

impl fmt::Display for TileTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer cell coordinate inside a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPosition {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl GridPosition {
    /// Cell at column `x`, row `y`.
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Canonical, format-agnostic level header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelHeader {
    /// Display name.
    pub name: String,
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
    /// Draw order: later layers overlay earlier ones.
    pub layers: Vec<String>,
}

/// One named grid of tile types, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLayer {
    /// Name from the level header.
    pub name: String,
    cells: Vec<Option<TileTypeId>>,
}

impl LevelLayer {
    /// Layer from row-major `cells`.
    pub fn new(name: impl Into<String>, cells: Vec<Option<TileTypeId>>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// A layer with every cell empty.
    pub fn empty(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self::new(name, vec![None; width as usize * height as usize])
    }

    /// Row-major cells; `None` is empty.
    pub fn cells(&self) -> &[Option<TileTypeId>] {
        &self.cells
    }
}

/// A parsed, validated level: the header plus one layer per header entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    header: LevelHeader,
    layers: Vec<LevelLayer>,
}

impl Level {
    /// Builds a level, reordering `layers` to the header order.
    ///
    /// Every header layer must be present exactly once and hold
    /// `width * height` cells.
    pub fn new(header: LevelHeader, mut layers: Vec<LevelLayer>) -> Result<Self, LevelError> {
        if let Some(extra) = layers
            .iter()
            .find(|l| !header.layers.iter().any(|name| *name == l.name))
        {
            return Err(LevelError::UnknownLayer(extra.name.clone()));
        }

        let expected = header.width as usize * header.height as usize;
        let mut ordered = Vec::with_capacity(header.layers.len());
        for name in &header.layers {
            let idx = layers
                .iter()
                .position(|l| l.name == *name)
                .ok_or_else(|| LevelError::UnknownLayer(name.clone()))?;
            let layer = layers.swap_remove(idx);
            if layer.cells.len() != expected {
                return Err(LevelError::DimensionMismatch {
                    layer: layer.name,
                    expected: (header.width, header.height),
                    found: (
                        header.width,
                        (layer.cells.len() / header.width.max(1) as usize) as u32,
                    ),
                });
            }
            ordered.push(layer);
        }

        Ok(Self {
            header,
            layers: ordered,
        })
    }

    /// Level header.
    pub fn header(&self) -> &LevelHeader {
        &self.header
    }

    /// Level name.
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Columns.
    pub fn width(&self) -> u32 {
        self.header.width
    }

    /// Rows.
    pub fn height(&self) -> u32 {
        self.header.height
    }

    /// Layers in draw order.
    pub fn layers(&self) -> &[LevelLayer] {
        &self.layers
    }

    /// Draw-order index of the layer called `name`.
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    #[inline]
    fn cell_index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.header.width && y < self.header.height)
            .then(|| y as usize * self.header.width as usize + x as usize)
    }

    /// Tile type at a cell, `None` for empty or out-of-range cells.
    pub fn tile(&self, layer: usize, x: u32, y: u32) -> Option<TileTypeId> {
        let idx = self.cell_index(x, y)?;
        self.layers.get(layer)?.cells[idx]
    }

    /// Replaces one cell. Returns `false` when the cell does not exist.
    pub fn set_tile(&mut self, layer: usize, x: u32, y: u32, tile: Option<TileTypeId>) -> bool {
        let Some(idx) = self.cell_index(x, y) else {
            return false;
        };
        match self.layers.get_mut(layer) {
            Some(l) => {
                l.cells[idx] = tile;
                true
            }
            None => false,
        }
    }

    /// Every distinct tile type referenced by any layer.
    pub fn tile_types(&self) -> Vec<TileTypeId> {
        let mut ids: Vec<TileTypeId> = self
            .layers
            .iter()
            .flat_map(|l| l.cells.iter().flatten().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(layers: &[&str]) -> LevelHeader {
        LevelHeader {
            name: "test".into(),
            width: 2,
            height: 2,
            layers: layers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn layers_follow_header_order() {
        let level = Level::new(
            header(&["terrain", "units"]),
            vec![LevelLayer::empty("units", 2, 2), LevelLayer::empty("terrain", 2, 2)],
        )
        .unwrap();
        let names: Vec<&str> = level.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["terrain", "units"]);
    }

    #[test]
    fn rejects_short_layer() {
        let err = Level::new(
            header(&["terrain"]),
            vec![LevelLayer::new("terrain", vec![None; 3])],
        )
        .unwrap_err();
        assert!(matches!(err, LevelError::DimensionMismatch { layer, .. } if layer == "terrain"));
    }

    #[test]
    fn rejects_undeclared_layer() {
        let err = Level::new(
            header(&["terrain"]),
            vec![LevelLayer::empty("terrain", 2, 2), LevelLayer::empty("loot", 2, 2)],
        )
        .unwrap_err();
        assert!(matches!(err, LevelError::UnknownLayer(name) if name == "loot"));
    }

    #[test]
    fn set_tile_rejects_out_of_bounds() {
        let mut level =
            Level::new(header(&["terrain"]), vec![LevelLayer::empty("terrain", 2, 2)]).unwrap();
        assert!(level.set_tile(0, 1, 1, Some(TileTypeId(3))));
        assert!(!level.set_tile(0, 2, 0, Some(TileTypeId(3))));
        assert!(!level.set_tile(1, 0, 0, None));
        assert_eq!(level.tile(0, 1, 1), Some(TileTypeId(3)));
        assert_eq!(level.tile_types(), vec![TileTypeId(3)]);
    }
}
