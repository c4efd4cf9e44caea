//! Reads a tileset definition file into a [`Tileset`].
//!
//! Only the `tileset` table, its `image` field and the image itself are
//! mandatory. The optional sections degrade cell by cell, except that a
//! missing walkability row rejects the whole file.

use tracing::debug;

use crate::config::{TilesetConfig, GRID_COLS, GRID_ROWS, TILE_COUNT};
use crate::diagnostics::Diagnostics;
use crate::error::{Result, TilesetError};
use crate::script::{ScriptKey, ScriptReader};
use crate::slicer::slice_file;
use crate::tileset::{tileset_name, AnimatedTile, Quadrants, Tileset};

impl Tileset {
    /// Loads the definition at `definition_path` (relative to the asset root).
    pub fn load(
        definition_path: &str,
        config: &TilesetConfig,
        diag: &mut Diagnostics,
    ) -> Result<Tileset> {
        let mut tileset = Tileset::empty();
        tileset.reload(definition_path, config, diag)?;
        Ok(tileset)
    }

    /// Replaces this tileset's contents with the definition at
    /// `definition_path`. On failure the tileset is left uninitialized.
    pub fn reload(
        &mut self,
        definition_path: &str,
        config: &TilesetConfig,
        diag: &mut Diagnostics,
    ) -> Result<()> {
        self.reset();
        if definition_path.is_empty() {
            return Err(TilesetError::InvalidFilename("definition".to_owned()));
        }

        let mut reader = ScriptReader::new();
        let outcome = read_definition(self, &mut reader, definition_path, config, diag);
        reader.close_all_tables();
        reader.close_file();

        match outcome {
            Ok(()) => {
                self.initialized = true;
                debug!(name = %self.name, "tileset loaded");
                Ok(())
            }
            Err(e) => {
                self.initialized = false;
                Err(e)
            }
        }
    }
}

fn read_definition(
    ts: &mut Tileset,
    reader: &mut ScriptReader,
    definition_path: &str,
    config: &TilesetConfig,
    diag: &mut Diagnostics,
) -> Result<()> {
    ts.name = tileset_name(definition_path);
    ts.definition_path = definition_path.to_owned();

    reader.open_file(&config.resolve(definition_path))?;
    if !reader.open_table("tileset") {
        return Err(TilesetError::Schema("missing 'tileset' table".to_owned()));
    }

    ts.image_path = reader
        .read_string("image")
        .ok_or_else(|| TilesetError::Schema("'tileset.image' is missing or not a string".to_owned()))?;
    ts.tiles = slice_file(&config.resolve(&ts.image_path), config.one_image, diag)?;

    read_autotiling(ts, reader, diag);
    read_walkability(ts, reader, diag)?;
    read_animated_tiles(ts, reader, diag);

    reader.close_table();
    Ok(())
}

fn tile_index(key: &ScriptKey) -> Option<u32> {
    match key {
        ScriptKey::Index(i) if (0..TILE_COUNT as i64).contains(i) => Some(*i as u32),
        _ => None,
    }
}

fn read_autotiling(ts: &mut Tileset, reader: &mut ScriptReader, diag: &mut Diagnostics) {
    if !reader.does_table_exist("autotiling") {
        return;
    }
    diag.trace("reading autotiling");
    reader.open_table("autotiling");
    for key in reader.table_keys() {
        let Some(index) = tile_index(&key) else {
            diag.warn(format!("autotiling key {} is not a tile index, skipped", key));
            continue;
        };
        match reader.read_string(index) {
            Some(group) => {
                ts.autotileability.insert(index, group);
            }
            None => diag.warn(format!("autotiling[{}] is not a string, skipped", index)),
        }
    }
    reader.close_table();
}

fn quadrants(values: &[i64]) -> Option<Quadrants> {
    if values.len() != 4 {
        return None;
    }
    let mut out = [0i32; 4];
    for (slot, v) in out.iter_mut().zip(values) {
        *slot = i32::try_from(*v).ok()?;
    }
    Some(out)
}

fn read_walkability(
    ts: &mut Tileset,
    reader: &mut ScriptReader,
    diag: &mut Diagnostics,
) -> Result<()> {
    ts.fill_default_walkability();
    if !reader.does_table_exist("walkability") {
        diag.warn("no walkability table, every tile defaults to walkable");
        return Ok(());
    }
    diag.trace("reading walkability");
    reader.open_table("walkability");

    for row in 0..GRID_ROWS {
        if !reader.open_table(row) {
            return Err(TilesetError::Schema(format!(
                "walkability row {} is missing",
                row
            )));
        }
        for col in 0..GRID_COLS {
            let index = row * GRID_COLS + col;
            match reader.read_int_vector(col).as_deref().and_then(quadrants) {
                Some(q) => {
                    ts.walkability.insert(index, q);
                }
                None => diag.warn(format!(
                    "walkability[{}][{}] is not four integers, tile {} left walkable",
                    row, col, index
                )),
            }
        }
        reader.close_table();
    }

    reader.close_table();
    Ok(())
}

fn read_animation(reader: &mut ScriptReader, frame_count: usize) -> Option<Vec<AnimatedTile>> {
    let mut frames = Vec::with_capacity(frame_count);
    for k in 1..=frame_count as i64 {
        let tile_id = reader.read_uint(2 * k - 1)?;
        let duration_ms = reader.read_uint(2 * k)?;
        if tile_id as usize >= TILE_COUNT {
            return None;
        }
        frames.push(AnimatedTile {
            tile_id,
            duration_ms,
        });
    }
    Some(frames)
}

fn read_animated_tiles(ts: &mut Tileset, reader: &mut ScriptReader, diag: &mut Diagnostics) {
    if !reader.does_table_exist("animated_tiles") {
        return;
    }
    diag.trace("reading animated tiles");
    let count = reader.table_size("animated_tiles");
    reader.open_table("animated_tiles");

    for i in 1..=count as i64 {
        let size = reader.table_size(i);
        if size == 0 || size % 2 != 0 {
            diag.warn(format!(
                "animated_tiles[{}] has {} values, expected tile/duration pairs; skipped",
                i, size
            ));
            continue;
        }
        reader.open_table(i);
        match read_animation(reader, size / 2) {
            Some(frames) => ts.animated_tiles.push(frames),
            None => diag.warn(format!(
                "animated_tiles[{}] holds an invalid tile id or duration; skipped",
                i
            )),
        }
        reader.close_table();
    }

    reader.close_table();
}
