#![warn(missing_docs)]
//! Tileset definitions for a 2D map editor: slicing the tileset image,
//! reading and writing the definition script, and creating new tilesets.

mod config;
mod create;
mod diagnostics;
mod error;
mod loader {
    pub mod definition;
}
pub mod script;
mod slicer;
mod summary;
mod tileset;
pub mod view;
mod writer;

pub use config::{TilesetConfig, GRID_COLS, GRID_ROWS, TILE_COUNT, TILE_HEIGHT, TILE_WIDTH};
pub use diagnostics::Diagnostics;
pub use error::{Result, TilesetError};
pub use slicer::{slice_file, slice_image, TileSlot};
pub use summary::TilesetSummary;
pub use tileset::{tileset_name, AnimatedTile, Quadrants, Tileset, WALKABLE};
