// tests/load_tests.rs

use std::fs;
use std::path::PathBuf;

use macroquad_isoline::loader::{json_loader::parse_level_json, mdmap::parse_mdmap};
use macroquad_isoline::{load_level_file, LevelError, TileKind, TileRegistry};

const MDMAP: &str = "\
# Level: Oasis
Size: 3x2
Layers:
  - ground
  - props

[legend: ground]
* = Water

[layer: ground]
~~~
S*S
SSS
~~~

[layer: props]
~~~
..P
~~~
";

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("mq_isoline_{}_{name}", std::process::id()));
    path
}

#[test]
fn integration_load_mdmap_from_file_and_str() {
    let registry = TileRegistry::builtin();
    let level = parse_mdmap(MDMAP, &registry).expect("should parse inline mdmap");
    assert_eq!(level.name(), "Oasis");
    assert_eq!(level.layers().len(), 2);
    assert_eq!(level.tile(0, 1, 0), registry.id_of(TileKind::Water));
    assert_eq!(level.tile(1, 2, 0), registry.id_of(TileKind::Pyramid));
    assert_eq!(level.tile(1, 2, 1), None);

    let path = temp_path("oasis.mdmap");
    fs::write(&path, MDMAP).unwrap();
    let from_file = load_level_file(&path, &registry).unwrap();
    assert_eq!(from_file, level);
    fs::remove_file(&path).unwrap();
}

#[test]
fn integration_load_json_file() {
    let registry = TileRegistry::builtin();
    let json = r#"
    {
        "name": "Tundra",
        "width": 2,
        "height": 2,
        "legend": { "n": "Snow" },
        "layers": [ { "name": "ground", "rows": ["nn", "nF"] } ]
    }
    "#;
    let inline = parse_level_json(json, &registry).unwrap();

    let path = temp_path("tundra.JSON");
    fs::write(&path, json).unwrap();
    let level = load_level_file(&path, &registry).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(level, inline);
    assert_eq!(level.tile(0, 0, 0), registry.id_of(TileKind::Snow));
    assert_eq!(level.tile(0, 1, 1), registry.id_of(TileKind::Forest));
}

#[test]
fn integration_unsupported_format() {
    let err = load_level_file("foo.tmx", &TileRegistry::builtin()).unwrap_err();
    match err.downcast_ref::<LevelError>() {
        Some(LevelError::UnsupportedFormat(ext)) => assert_eq!(ext, "tmx"),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn integration_parse_errors_keep_their_type() {
    let path = temp_path("bad.mdmap");
    fs::write(&path, "# Level: bad\nSize: 2x1\nLayers:\n  - t\n[layer: t]\n~~~\nG#\n~~~\n")
        .unwrap();
    let err = load_level_file(&path, &TileRegistry::builtin()).unwrap_err();
    fs::remove_file(&path).unwrap();

    assert!(err.to_string().contains("bad.mdmap"), "{err:#}");
    match err.downcast_ref::<LevelError>() {
        Some(LevelError::UnknownSymbol { symbol, .. }) => assert_eq!(*symbol, '#'),
        other => panic!("expected UnknownSymbol, got {:?}", other),
    }
}
