use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::TILE_COUNT;
use crate::error::{Result, TilesetError};
use crate::slicer::TileSlot;

/// Passability of a tile's four corners, ordered NW, NE, SW, SE.
/// Zero means walkable.
pub type Quadrants = [i32; 4];

/// Fully walkable tile.
pub const WALKABLE: Quadrants = [0, 0, 0, 0];

/// One frame of an animated tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimatedTile {
    /// Index into the tileset of the tile shown for this frame.
    pub tile_id: u32,
    /// How long the frame stays on screen, in milliseconds.
    pub duration_ms: u32,
}

impl AnimatedTile {
    /// Frame showing `tile_id` for `duration_ms`.
    pub fn new(tile_id: u32, duration_ms: u32) -> Self {
        Self {
            tile_id,
            duration_ms,
        }
    }
}

/// Returns the tileset name for an image or definition filename: everything
/// after the last `/`, minus the four-character extension.
pub fn tileset_name(filename: &str) -> String {
    let base = match filename.rfind('/') {
        Some(i) => &filename[i + 1..],
        None => filename,
    };
    let keep = base.chars().count().saturating_sub(4);
    base.chars().take(keep).collect()
}

/// A 16x16 catalog of tiles plus per-tile walkability, autotiling and
/// animation metadata.
///
/// The model owns all of its data. Mutators reject tile indices outside the
/// logical grid so the metadata can always be written back out.
#[derive(Debug, Clone, Default)]
pub struct Tileset {
    pub(crate) name: String,
    pub(crate) image_path: String,
    pub(crate) definition_path: String,
    pub(crate) tiles: Vec<TileSlot>,
    pub(crate) walkability: BTreeMap<u32, Quadrants>,
    pub(crate) autotileability: BTreeMap<u32, String>,
    pub(crate) animated_tiles: Vec<Vec<AnimatedTile>>,
    pub(crate) initialized: bool,
}

impl Tileset {
    /// Uninitialized tileset holding no data.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Drops every field back to the empty state.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn fill_default_walkability(&mut self) {
        self.walkability = (0..TILE_COUNT as u32).map(|i| (i, WALKABLE)).collect();
    }

    fn check_index(index: u32) -> Result<()> {
        if (index as usize) < TILE_COUNT {
            Ok(())
        } else {
            Err(TilesetError::InvalidTileIndex {
                index,
                limit: TILE_COUNT,
            })
        }
    }

    /// Name derived from the definition or image filename.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source image, relative to the asset root.
    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    /// Definition file, relative to the asset root.
    pub fn definition_path(&self) -> &str {
        &self.definition_path
    }

    /// True once a load or create has fully succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Sliced tile images: 256 slots, or a single one in one-image mode.
    pub fn tiles(&self) -> &[TileSlot] {
        &self.tiles
    }

    /// Pixels of tile `index`, if it was sliced.
    pub fn tile(&self, index: usize) -> Option<&image::RgbaImage> {
        self.tiles.get(index).and_then(Option::as_ref)
    }

    /// Number of tile slots: 256, or 1 in one-image mode.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// True when the image was kept whole.
    pub fn is_one_image(&self) -> bool {
        self.tiles.len() == 1
    }

    /// Quadrants for all 256 tiles.
    pub fn walkability(&self) -> &BTreeMap<u32, Quadrants> {
        &self.walkability
    }

    /// Quadrants of tile `index`.
    pub fn walkability_of(&self, index: u32) -> Option<Quadrants> {
        self.walkability.get(&index).copied()
    }

    /// Replaces the quadrants of tile `index`.
    pub fn set_walkability(&mut self, index: u32, quadrants: Quadrants) -> Result<()> {
        Self::check_index(index)?;
        self.walkability.insert(index, quadrants);
        Ok(())
    }

    /// Autotile group per tile; tiles without one are absent.
    pub fn autotileability(&self) -> &BTreeMap<u32, String> {
        &self.autotileability
    }

    /// Autotile group of tile `index`.
    pub fn autotile_group(&self, index: u32) -> Option<&str> {
        self.autotileability.get(&index).map(String::as_str)
    }

    /// Puts tile `index` in autotile group `group`, replacing any previous one.
    pub fn set_autotile(&mut self, index: u32, group: impl Into<String>) -> Result<()> {
        Self::check_index(index)?;
        self.autotileability.insert(index, group.into());
        Ok(())
    }

    /// Removes tile `index` from its autotile group, returning the group.
    pub fn clear_autotile(&mut self, index: u32) -> Option<String> {
        self.autotileability.remove(&index)
    }

    /// Animation sequences in file order.
    pub fn animations(&self) -> &[Vec<AnimatedTile>] {
        &self.animated_tiles
    }

    /// Appends an animation sequence and returns its position.
    pub fn add_animation(&mut self, frames: Vec<AnimatedTile>) -> Result<usize> {
        if frames.is_empty() {
            return Err(TilesetError::EmptyAnimation);
        }
        for frame in &frames {
            Self::check_index(frame.tile_id)?;
        }
        self.animated_tiles.push(frames);
        Ok(self.animated_tiles.len() - 1)
    }

    /// Removes and returns the sequence at `position`.
    pub fn remove_animation(&mut self, position: usize) -> Option<Vec<AnimatedTile>> {
        if position < self.animated_tiles.len() {
            Some(self.animated_tiles.remove(position))
        } else {
            None
        }
    }
}

/// Two tilesets are equal when their metadata and paths match; tile pixels
/// are referenced by path and not compared.
impl PartialEq for Tileset {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.image_path == other.image_path
            && self.definition_path == other.definition_path
            && self.tiles.len() == other.tiles.len()
            && self.walkability == other.walkability
            && self.autotileability == other.autotileability
            && self.animated_tiles == other.animated_tiles
            && self.initialized == other.initialized
    }
}
