use std::path::{Path, PathBuf};

/// Width of a single tile in pixels.
pub const TILE_WIDTH: u32 = 32;
/// Height of a single tile in pixels.
pub const TILE_HEIGHT: u32 = 32;
/// Number of tile columns in a tileset image.
pub const GRID_COLS: u32 = 16;
/// Number of tile rows in a tileset image.
pub const GRID_ROWS: u32 = 16;
/// Logical number of tiles addressed by a tileset's metadata.
pub const TILE_COUNT: usize = (GRID_COLS * GRID_ROWS) as usize;

const DEFAULT_DEFINITION_DIR: &str = "data/tilesets";
const DEFAULT_DEFINITION_EXTENSION: &str = "lua";

/// Where tileset assets live and how their images are decoded.
///
/// Every path stored inside a [`Tileset`](crate::Tileset) is relative; the
/// config supplies the asset root they are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetConfig {
    /// Root of the game data; relative asset paths are joined onto it.
    pub asset_root: PathBuf,
    /// Keep the whole source image as one tile instead of slicing a grid.
    pub one_image: bool,
    /// Directory (relative to `asset_root`) holding definitions and images.
    pub definition_dir: String,
    /// Extension of definition files, without the dot.
    pub definition_extension: String,
}

impl Default for TilesetConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("."),
            one_image: false,
            definition_dir: DEFAULT_DEFINITION_DIR.to_owned(),
            definition_extension: DEFAULT_DEFINITION_EXTENSION.to_owned(),
        }
    }
}

impl TilesetConfig {
    /// Config rooted at `asset_root` with default layout.
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
            ..Self::default()
        }
    }

    /// Treats the whole image as a single tile.
    pub fn with_one_image(mut self, one_image: bool) -> Self {
        self.one_image = one_image;
        self
    }

    /// Directory, relative to the asset root, that holds definition files.
    pub fn with_definition_dir(mut self, dir: impl Into<String>) -> Self {
        self.definition_dir = dir.into();
        self
    }

    /// Joins a relative asset path onto the asset root.
    ///
    /// Leading slashes are ignored so editor-style paths such as
    /// `/data/tilesets/x.lua` still stay under the root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.asset_root.join(relative.trim_start_matches('/'))
    }

    /// Relative definition path for a tileset `name`.
    pub fn definition_path_for(&self, name: &str) -> String {
        format!(
            "{}/{}.{}",
            self.definition_dir.trim_end_matches('/'),
            name,
            self.definition_extension
        )
    }

    /// Relative image path for a tileset `name` whose image carries `extension`
    /// (including the leading dot).
    pub fn image_path_for(&self, name: &str, extension: &str) -> String {
        format!(
            "{}/{}{}",
            self.definition_dir.trim_end_matches('/'),
            name,
            extension
        )
    }

    /// Directory every relative path is resolved against.
    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }
}
