use tracing::debug;

use crate::config::TilesetConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{Result, TilesetError};
use crate::slicer::slice_file;
use crate::tileset::{tileset_name, Tileset};

/// Last four characters of `filename` (the extension with its dot).
fn image_extension(filename: &str) -> String {
    let count = filename.chars().count();
    filename.chars().skip(count.saturating_sub(4)).collect()
}

impl Tileset {
    /// Starts a brand-new tileset from an image, with every tile walkable
    /// and no autotiling or animations.
    ///
    /// The name comes from `image_filename`; the image itself is expected at
    /// `<definition_dir>/<name><ext>` under the asset root. Fails with
    /// [`TilesetError::AlreadyExists`] if the definition file for that name is
    /// already on disk. Nothing is written.
    pub fn create(
        image_filename: &str,
        config: &TilesetConfig,
        diag: &mut Diagnostics,
    ) -> Result<Tileset> {
        let mut tileset = Tileset::empty();
        tileset.create_into(image_filename, config, diag)?;
        Ok(tileset)
    }

    /// In-place form of [`Tileset::create`]; prior contents are discarded.
    pub fn create_into(
        &mut self,
        image_filename: &str,
        config: &TilesetConfig,
        diag: &mut Diagnostics,
    ) -> Result<()> {
        self.reset();
        if image_filename.is_empty() {
            return Err(TilesetError::InvalidFilename("image".to_owned()));
        }

        let name = tileset_name(image_filename);
        let definition_path = config.definition_path_for(&name);
        let existing = config.resolve(&definition_path);
        if existing.exists() {
            return Err(TilesetError::AlreadyExists(existing));
        }

        let image_path = config.image_path_for(&name, &image_extension(image_filename));
        let tiles = slice_file(&config.resolve(&image_path), config.one_image, diag)?;

        self.name = name;
        self.definition_path = definition_path;
        self.image_path = image_path;
        self.tiles = tiles;
        self.fill_default_walkability();
        self.initialized = true;
        debug!(name = %self.name, "tileset created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_last_four_chars() {
        assert_eq!(image_extension("data/tilesets/x.png"), ".png");
        assert_eq!(image_extension("ab"), "ab");
    }
}
