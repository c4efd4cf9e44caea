// tests/create_tests.rs

mod common;

use std::fs;

use common::{asset_root, write_png};
use tileset_forge::{Diagnostics, Tileset, TilesetError, WALKABLE};

#[test]
fn new_tileset_has_default_metadata() {
    let (_dir, cfg) = asset_root();
    let mut diag = Diagnostics::new();

    // Editor passes the picked file relative to the asset root.
    let ts = Tileset::create("/data/tilesets/forest.png", &cfg, &mut diag).expect("create");
    assert!(ts.is_initialized());
    assert_eq!(ts.name(), "forest");
    assert_eq!(ts.definition_path(), "data/tilesets/forest.lua");
    assert_eq!(ts.image_path(), "data/tilesets/forest.png");
    assert_eq!(ts.tile_count(), 256);
    assert_eq!(ts.walkability().len(), 256);
    assert!(ts.walkability().values().all(|q| *q == WALKABLE));
    assert!(ts.autotileability().is_empty());
    assert!(ts.animations().is_empty());
    assert!(!cfg.resolve(ts.definition_path()).exists(), "create must not write");
}

#[test]
fn existing_definition_blocks_creation() {
    let (_dir, cfg) = asset_root();
    let def = cfg.resolve("data/tilesets/forest.lua");
    fs::write(&def, "tileset = {}\n").expect("write");

    let mut diag = Diagnostics::new();
    let err = Tileset::create("forest.png", &cfg, &mut diag).unwrap_err();
    assert!(matches!(err, TilesetError::AlreadyExists(ref p) if *p == def));
    assert_eq!(fs::read_to_string(&def).expect("read"), "tileset = {}\n");
}

#[test]
fn failed_create_into_resets_previous_state() {
    let (_dir, cfg) = asset_root();
    let mut diag = Diagnostics::new();
    let mut ts = Tileset::create("forest.png", &cfg, &mut diag).expect("create");
    ts.set_autotile(1, "grass").expect("in range");

    let err = ts.create_into("missing.png", &cfg, &mut diag).unwrap_err();
    assert!(matches!(err, TilesetError::FileOpen { .. }));
    assert!(!ts.is_initialized());
    assert!(ts.autotileability().is_empty());

    assert!(matches!(
        ts.create_into("", &cfg, &mut diag),
        Err(TilesetError::InvalidFilename(_))
    ));
}

#[test]
fn one_image_create_keeps_whole_picture() {
    let (dir, cfg) = asset_root();
    write_png(&dir.path().join("data/tilesets/wide.png"), 1024, 64);

    let cfg = cfg.with_one_image(true);
    let mut diag = Diagnostics::new();
    let ts = Tileset::create("wide.png", &cfg, &mut diag).expect("create");
    assert_eq!(ts.tile_count(), 1);
    assert_eq!(ts.tile(0).map(|t| t.dimensions()), Some((1024, 64)));
    assert_eq!(ts.walkability().len(), 256);
}

#[test]
fn created_tileset_saves_and_then_blocks_recreation() {
    let (_dir, cfg) = asset_root();
    let mut diag = Diagnostics::new();
    let ts = Tileset::create("forest.png", &cfg, &mut diag).expect("create");
    ts.save(&cfg, &mut diag).expect("save");

    let err = Tileset::create("forest.png", &cfg, &mut diag).unwrap_err();
    assert!(matches!(err, TilesetError::AlreadyExists(_)));
}
