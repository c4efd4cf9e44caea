// tests/save_tests.rs

mod common;

use std::fs;

use common::{asset_root, header, walkability_block, write_definition};
use tileset_forge::{AnimatedTile, Diagnostics, Tileset, TilesetConfig, TilesetError};

const DEF: &str = "data/tilesets/forest.lua";

#[test]
fn save_then_load_round_trips() -> anyhow::Result<()> {
    let (_dir, cfg) = asset_root();
    let mut diag = Diagnostics::new();

    let mut ts = Tileset::create("forest.png", &cfg, &mut diag)?;
    ts.set_walkability(0, [1, 1, 1, 1])?;
    ts.set_walkability(255, [0, 1, 0, -1])?;
    ts.set_autotile(16, "grass")?;
    ts.set_autotile(200, "cliff \"north\"")?;
    ts.add_animation(vec![AnimatedTile::new(3, 100), AnimatedTile::new(4, 200)])?;
    ts.add_animation(vec![AnimatedTile::new(0, 50)])?;
    ts.save(&cfg, &mut diag)?;

    let loaded = Tileset::load(ts.definition_path(), &cfg, &mut diag)?;
    assert_eq!(loaded, ts);
    assert_eq!(loaded.autotile_group(200), Some("cliff \"north\""));
    assert!(!diag.has_warnings(), "{:?}", diag.warnings());
    Ok(())
}

#[test]
fn written_layout_matches_definition_format() -> anyhow::Result<()> {
    let (_dir, cfg) = asset_root();
    let mut diag = Diagnostics::new();

    let mut ts = Tileset::create("forest.png", &cfg, &mut diag)?;
    ts.set_autotile(5, "water")?;
    ts.set_walkability(17, [1, 0, 1, 0])?;
    ts.add_animation(vec![AnimatedTile::new(3, 100), AnimatedTile::new(4, 200)])?;
    ts.save(&cfg, &mut diag)?;

    let text = fs::read_to_string(cfg.resolve(DEF))?;
    for expected in [
        "tileset = {}",
        "tileset.image = \"data/tilesets/forest.png\"",
        "tileset.num_tile_cols = 16",
        "tileset.num_tile_rows = 16",
        "tileset.autotiling[5] = \"water\"",
        "tileset.walkability[1][1] = { 1, 0, 1, 0 }",
        "tileset.walkability[15][15] = { 0, 0, 0, 0 }",
        "tileset.animated_tiles[1] = { 3, 100, 4, 200 }",
        "-- The general walkability",
    ] {
        assert!(text.contains(expected), "missing {expected:?} in:\n{text}");
    }
    assert_eq!(text.matches("tileset.walkability[").count(), 16 + 256);
    Ok(())
}

#[test]
fn empty_optional_sections_are_omitted_and_resave_is_stable() -> anyhow::Result<()> {
    let (_dir, cfg) = asset_root();
    let mut text = header("data/tilesets/forest.png");
    text.push_str(&walkability_block(None));
    write_definition(&cfg, DEF, &text);

    let mut diag = Diagnostics::new();
    let ts = Tileset::load(DEF, &cfg, &mut diag)?;
    ts.save(&cfg, &mut diag)?;
    let first = fs::read(cfg.resolve(DEF))?;
    let first_text = String::from_utf8(first.clone())?;
    assert!(!first_text.contains("autotiling"));
    assert!(!first_text.contains("animated_tiles"));

    let again = Tileset::load(DEF, &cfg, &mut diag)?;
    assert_eq!(again, ts);
    again.save(&cfg, &mut diag)?;
    assert_eq!(fs::read(cfg.resolve(DEF))?, first);
    Ok(())
}

#[test]
fn uninitialized_tileset_is_not_saved() {
    let (dir, cfg) = asset_root();
    let mut diag = Diagnostics::new();

    let ts = Tileset::empty();
    assert!(matches!(ts.save(&cfg, &mut diag), Err(TilesetError::NotInitialized)));

    let mut failed = Tileset::empty();
    assert!(failed.reload("data/tilesets/none.lua", &cfg, &mut diag).is_err());
    assert!(matches!(failed.save(&cfg, &mut diag), Err(TilesetError::NotInitialized)));

    let written: Vec<_> = fs::read_dir(dir.path().join("data/tilesets"))
        .expect("list")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|x| x == "lua"))
        .collect();
    assert!(written.is_empty());
}

#[test]
fn unwritable_destination_is_a_file_open_error() -> anyhow::Result<()> {
    let (_dir, cfg) = asset_root();
    let mut diag = Diagnostics::new();
    let ts = Tileset::create("forest.png", &cfg, &mut diag)?;

    let elsewhere = tempfile::tempdir()?;
    let moved = TilesetConfig::new(elsewhere.path().join("no_such_root"));
    let err = ts.save(&moved, &mut diag).unwrap_err();
    assert!(matches!(err, TilesetError::FileOpen { .. }));
    Ok(())
}
