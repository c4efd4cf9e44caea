// tests/common/mod.rs

#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};
use tempfile::TempDir;
use tileset_forge::TilesetConfig;

/// Temp asset root with `data/tilesets/` and a 512x512 `forest.png`.
pub fn asset_root() -> (TempDir, TilesetConfig) {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("data/tilesets")).expect("mkdir");
    write_png(&dir.path().join("data/tilesets/forest.png"), 512, 512);
    let cfg = TilesetConfig::new(dir.path());
    (dir, cfg)
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x / 32) as u8, (y / 32) as u8, 128, 255])
    });
    img.save(path).expect("write png");
}

/// `tileset.walkability` assignments, all cells walkable except tile 17
/// (`[1, 0, 1, 0]`). `skip_row` leaves one row table out.
pub fn walkability_block(skip_row: Option<u32>) -> String {
    let mut out = String::from("tileset.walkability = {}\n");
    for row in 0..16 {
        if Some(row) == skip_row {
            continue;
        }
        writeln!(out, "tileset.walkability[{row}] = {{}}").unwrap();
        for col in 0..16 {
            let q = if row * 16 + col == 17 { "1, 0, 1, 0" } else { "0, 0, 0, 0" };
            writeln!(out, "tileset.walkability[{row}][{col}] = {{ {q} }}").unwrap();
        }
    }
    out
}

pub fn header(image: &str) -> String {
    format!(
        "tileset = {{}}\n\ntileset.image = \"{image}\"\ntileset.num_tile_cols = 16\ntileset.num_tile_rows = 16\n\n"
    )
}

pub fn write_definition(cfg: &TilesetConfig, relative: &str, text: &str) {
    fs::write(cfg.resolve(relative), text).expect("write definition");
}
