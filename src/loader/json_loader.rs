// src/loader/json_loader.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::mdmap::{grid_to_layer, Legend};
use crate::error::LevelError;
use crate::level::{Level, LevelHeader};
use crate::tiles::TileRegistry;

#[derive(Deserialize)]
struct JsonLayer {
    name: String,
    #[serde(default)]
    rows: Vec<String>,
    #[serde(default)]
    legend: HashMap<char, String>,
}

#[derive(Deserialize)]
struct JsonLevel {
    name: String,
    width: u32,
    height: u32,
    layers: Vec<JsonLayer>,
    // shared by every layer; a layer's own legend wins
    #[serde(default)]
    legend: HashMap<char, String>,
}

/// Parses a JSON level document:
///
/// ```json
/// {
///   "name": "Meadow",
///   "width": 3,
///   "height": 2,
///   "legend": { "G": "Grass" },
///   "layers": [
///     { "name": "terrain", "rows": ["GGW", "GSW"] },
///     { "name": "units", "rows": ["...", ".P."] }
///   ]
/// }
/// ```
///
/// Layers draw in array order and use the same symbols as `.mdmap` grids.
pub fn parse_level_json(text: &str, registry: &TileRegistry) -> Result<Level, LevelError> {
    parse_at(text, Path::new("<inline>"), registry)
}

/// Reads and parses a JSON level file.
pub fn decode_level_file(path: &Path, registry: &TileRegistry) -> Result<Level, LevelError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(LevelError::UnsupportedFormat(format!(
            "level file must be JSON: {}",
            path.display()
        )));
    }
    let txt = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_at(&txt, path, registry)
}

fn parse_at(text: &str, path: &Path, registry: &TileRegistry) -> Result<Level, LevelError> {
    let j: JsonLevel = serde_json::from_str(text).map_err(|source| LevelError::Json {
        path: PathBuf::from(path),
        source,
    })?;

    let header = LevelHeader {
        name: j.name,
        width: j.width,
        height: j.height,
        layers: j.layers.iter().map(|l| l.name.clone()).collect(),
    };

    let mut layers = Vec::with_capacity(j.layers.len());
    for l in &j.layers {
        let mut legend: Legend = j.legend.clone();
        legend.extend(l.legend.iter().map(|(k, v)| (*k, v.clone())));
        layers.push(grid_to_layer(&l.name, &l.rows, &legend, &header, registry)?);
    }

    Level::new(header, layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::TileKind;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("mq_isoline_json_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn parses_layers_and_legends() {
        let registry = TileRegistry::builtin();
        let level = parse_level_json(
            r#"{
              "name": "Dunes",
              "width": 3,
              "height": 2,
              "legend": { "x": "Sand" },
              "layers": [
                { "name": "terrain", "rows": ["xxW", "xL"] },
                { "name": "units", "rows": ["...", ".P."], "legend": { "P": "Pyramid" } }
              ]
            }"#,
            &registry,
        )
        .unwrap();

        assert_eq!(level.name(), "Dunes");
        assert_eq!(level.tile(0, 0, 0), registry.id_of(TileKind::Sand));
        assert_eq!(level.tile(0, 2, 0), registry.id_of(TileKind::Water));
        assert_eq!(level.tile(0, 1, 1), registry.id_of(TileKind::Lava));
        assert_eq!(level.tile(0, 2, 1), None);
        assert_eq!(level.tile(1, 1, 1), registry.id_of(TileKind::Pyramid));
    }

    #[test]
    fn reads_level_files() {
        let dir = temp_dir();
        let path = dir.join("level.json");
        fs::write(
            &path,
            r#"{"name":"f","width":1,"height":1,"layers":[{"name":"t","rows":["G"]}]}"#,
        )
        .expect("failed to write level");

        let level = decode_level_file(&path, &TileRegistry::builtin()).expect("decode");
        assert_eq!(level.layers().len(), 1);
        assert!(level.tile(0, 0, 0).is_some());
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let dir = temp_dir();
        let path = dir.join("broken.json");
        fs::write(&path, "{ \"name\": ").expect("failed to write level");

        let err = decode_level_file(&path, &TileRegistry::builtin()).unwrap_err();
        match err {
            LevelError::Json { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = temp_dir().join("absent.json");
        let err = decode_level_file(&path, &TileRegistry::builtin()).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }
}
