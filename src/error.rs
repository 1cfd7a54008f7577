use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::level::TileTypeId;
use crate::render::DrawableId;

/// Errors raised by the tile cache, the scene composer and the draw backends.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A tile type id reached the geometry cache without a registered kind.
    #[error("unknown tile type id {0}")]
    UnknownTileType(TileTypeId),

    /// An animation state outside the tile kind's cycle was requested.
    #[error("tile type {type_id} has no animation state {state} (it defines {count})")]
    InvalidAnimationState {
        /// Offending tile type.
        type_id: TileTypeId,
        /// Requested state index.
        state: u8,
        /// Number of states the tile kind defines.
        count: u8,
    },

    /// The backend was asked about a drawable it no longer owns.
    #[error("drawable {0} is not live")]
    StaleDrawable(DrawableId),

    /// The backend could not create or release a GPU-side drawable.
    #[error("GPU resource error: {0}")]
    Resource(String),

    /// A scene operation was requested while no level is loaded.
    #[error("no level loaded")]
    NoLevel,

    /// A tile edit addressed a cell outside the level.
    #[error("cell ({x}, {y}) in layer {layer} is outside the level")]
    CellOutOfBounds {
        /// Layer index in draw order.
        layer: usize,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
}

/// Errors produced while turning level text into a [`crate::Level`].
#[derive(Debug, Error)]
pub enum LevelError {
    /// Reading the level file failed.
    #[error("failed to read level {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The JSON level document is malformed.
    #[error("failed to parse level JSON {path}: {source}")]
    Json {
        /// Source of the document (`<inline>` for strings).
        path: PathBuf,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },

    /// The file extension is neither `mdmap` nor `json`.
    #[error("unsupported level format: {0}")]
    UnsupportedFormat(String),

    /// A mandatory header entry is missing.
    #[error("level header is missing `{0}`")]
    MissingHeader(&'static str),

    /// A line could not be understood.
    #[error("line {line}: {message}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Layer data names a layer the header does not list.
    #[error("layer `{0}` is not declared in the header")]
    UnknownLayer(String),

    /// A layer's grid does not match the header size.
    #[error("layer `{layer}` is {found:?} but the header declares {expected:?}")]
    DimensionMismatch {
        /// Layer name.
        layer: String,
        /// Header `(width, height)`.
        expected: (u32, u32),
        /// Found `(width, height)`; width is the offending row's length.
        found: (u32, u32),
    },

    /// A grid symbol resolves to no tile type.
    #[error("layer `{layer}` has unknown symbol {symbol:?} at ({x}, {y})")]
    UnknownSymbol {
        /// Layer name.
        layer: String,
        /// Offending character.
        symbol: char,
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
}

/// Errors produced while loading a [`crate::RenderConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The TOML document is malformed.
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
