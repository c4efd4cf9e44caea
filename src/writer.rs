use tracing::error;

use crate::config::{TilesetConfig, GRID_COLS, GRID_ROWS};
use crate::diagnostics::Diagnostics;
use crate::error::{Result, TilesetError};
use crate::script::ScriptWriter;
use crate::tileset::{Tileset, WALKABLE};

const WALKABILITY_COMMENT: &str = "The general walkability of the tiles in the tileset. \
Zero indicates walkable. One tile has four walkable quadrants listed as: \
NW corner, NE corner, SW corner, SE corner.";

const ANIMATED_TILES_COMMENT: &str = "The animated tiles table has one row per animated tile, \
with each entry in a row indicating which tile in the tileset is the next part of the animation, \
followed by the time in ms that the tile will be displayed for.";

impl Tileset {
    /// Writes this tileset to its definition file under the asset root.
    ///
    /// Empty autotiling and animation sections are left out entirely.
    /// Write problems are collected and returned together as
    /// [`TilesetError::Write`].
    pub fn save(&self, config: &TilesetConfig, diag: &mut Diagnostics) -> Result<()> {
        if !self.initialized {
            return Err(TilesetError::NotInitialized);
        }

        let path = config.resolve(&self.definition_path);
        diag.trace(format!("saving tileset {} to {}", self.name, path.display()));

        let mut writer = ScriptWriter::new();
        writer.open_file(&path)?;
        self.write_definition(&mut writer);
        writer.close_file();

        if writer.is_error_detected() {
            let messages = writer.error_messages().to_vec();
            error!(
                "Errors were detected when saving tileset file {}: {}",
                path.display(),
                messages.join("; ")
            );
            return Err(TilesetError::Write { path, messages });
        }
        Ok(())
    }

    fn write_definition(&self, w: &mut ScriptWriter) {
        w.begin_table("tileset");
        w.insert_new_line();

        w.write_string("image", &self.image_path);
        w.write_int("num_tile_cols", GRID_COLS as i64);
        w.write_int("num_tile_rows", GRID_ROWS as i64);
        w.insert_new_line();

        if !self.autotileability.is_empty() {
            w.begin_table("autotiling");
            for (index, group) in &self.autotileability {
                w.write_string_at(*index as i64, group);
            }
            w.end_table();
            w.insert_new_line();
        }

        w.write_comment(WALKABILITY_COMMENT);
        w.begin_table("walkability");
        for row in 0..GRID_ROWS {
            w.begin_table_at(row as i64);
            for col in 0..GRID_COLS {
                let quadrants = self
                    .walkability_of(row * GRID_COLS + col)
                    .unwrap_or(WALKABLE);
                w.write_int_vector_at(col as i64, &quadrants);
            }
            w.end_table();
        }
        w.end_table();
        w.insert_new_line();

        if !self.animated_tiles.is_empty() {
            w.write_comment(ANIMATED_TILES_COMMENT);
            w.begin_table("animated_tiles");
            for (i, frames) in self.animated_tiles.iter().enumerate() {
                let flat: Vec<u32> = frames
                    .iter()
                    .flat_map(|f| [f.tile_id, f.duration_ms])
                    .collect();
                w.write_uint_vector_at(i as i64 + 1, &flat);
            }
            w.end_table();
        }

        w.end_table();
    }
}
