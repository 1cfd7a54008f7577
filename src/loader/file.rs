// src/loader/file.rs
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use super::json_loader::decode_level_file;
use super::mdmap::parse_mdmap;
use crate::error::LevelError;
use crate::level::Level;
use crate::tiles::TileRegistry;

/// Loads a level from disk, picking the parser from the file extension
/// (`mdmap` or `json`).
pub fn load_level_file(path: impl AsRef<Path>, registry: &TileRegistry) -> anyhow::Result<Level> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let level = match ext.as_deref() {
        Some("mdmap") => {
            let txt = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_mdmap(&txt, registry)
                .with_context(|| format!("Parsing level {}", path.display()))?
        }
        Some("json") => decode_level_file(path, registry)
            .with_context(|| format!("Parsing level {}", path.display()))?,
        other => {
            return Err(LevelError::UnsupportedFormat(other.unwrap_or("").to_owned()).into());
        }
    };

    debug!(
        path = %path.display(),
        level = level.name(),
        width = level.width(),
        height = level.height(),
        "level file loaded"
    );
    Ok(level)
}
