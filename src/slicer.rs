use std::path::Path;

use image::{imageops, ImageError, ImageReader, RgbaImage};

use crate::config::{GRID_COLS, GRID_ROWS, TILE_HEIGHT, TILE_WIDTH};
use crate::diagnostics::Diagnostics;
use crate::error::{Result, TilesetError};

/// One tile's pixels. `None` marks a slot whose cell could not be cut out of
/// the source image.
pub type TileSlot = Option<RgbaImage>;

/// Decodes the image at `path` and slices it into tiles.
///
/// The format is sniffed from the file contents, so the extension does not
/// have to match.
pub fn slice_file(path: &Path, one_image: bool, diag: &mut Diagnostics) -> Result<Vec<TileSlot>> {
    diag.trace(format!("decoding tileset image {}", path.display()));
    let open_error = |source| TilesetError::FileOpen {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(open_error)?
        .decode()
        .map_err(|err| match err {
            ImageError::IoError(source) => open_error(source),
            source => TilesetError::ImageDecode {
                path: path.to_path_buf(),
                source,
            },
        })?;
    Ok(slice_image(&img.to_rgba8(), one_image, diag))
}

/// Cuts `img` into the 16x16 grid of 32x32 tiles, row-major.
///
/// With `one_image` the whole picture becomes the only tile. Cells that are
/// not fully inside the image are left empty and reported to `diag`.
pub fn slice_image(img: &RgbaImage, one_image: bool, diag: &mut Diagnostics) -> Vec<TileSlot> {
    if one_image {
        return vec![Some(img.clone())];
    }

    let (width, height) = img.dimensions();
    let mut tiles = Vec::with_capacity((GRID_COLS * GRID_ROWS) as usize);
    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            let x = col * TILE_WIDTH;
            let y = row * TILE_HEIGHT;
            if x + TILE_WIDTH <= width && y + TILE_HEIGHT <= height {
                tiles.push(Some(imageops::crop_imm(img, x, y, TILE_WIDTH, TILE_HEIGHT).to_image()));
            } else {
                diag.warn(format!(
                    "tile {} at ({}, {}) lies outside the {}x{} image",
                    row * GRID_COLS + col,
                    x,
                    y,
                    width,
                    height
                ));
                tiles.push(None);
            }
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn marked_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x / TILE_WIDTH) as u8, (y / TILE_HEIGHT) as u8, 0, 255])
        })
    }

    #[test]
    fn slices_row_major_grid() {
        let mut diag = Diagnostics::new();
        let tiles = slice_image(&marked_image(512, 512), false, &mut diag);
        assert_eq!(tiles.len(), 256);
        assert!(!diag.has_warnings());

        let tile = tiles[3 * 16 + 5].as_ref().expect("tile present");
        assert_eq!(tile.dimensions(), (32, 32));
        assert_eq!(tile.get_pixel(0, 0), &Rgba([5, 3, 0, 255]));
        assert_eq!(tile.get_pixel(31, 31), &Rgba([5, 3, 0, 255]));
    }

    #[test]
    fn undersized_image_leaves_blank_slots() {
        let mut diag = Diagnostics::new();
        let tiles = slice_image(&marked_image(512, 64), false, &mut diag);
        assert_eq!(tiles.len(), 256);
        assert_eq!(tiles.iter().filter(|t| t.is_some()).count(), 32);
        assert!(tiles[32].is_none());
        assert_eq!(diag.warnings().len(), 224);
    }

    #[test]
    fn one_image_keeps_whole_picture() {
        let mut diag = Diagnostics::new();
        let tiles = slice_image(&marked_image(100, 40), true, &mut diag);
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].as_ref().map(|t| t.dimensions()), Some((100, 40)));
    }

    #[test]
    fn missing_file_is_open_error_and_garbage_is_decode_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut diag = Diagnostics::new();

        let err = slice_file(&dir.path().join("nope.png"), false, &mut diag).unwrap_err();
        assert!(matches!(err, TilesetError::FileOpen { .. }));

        let bad = dir.path().join("bad.png");
        std::fs::write(&bad, b"definitely not a png").expect("write");
        let err = slice_file(&bad, false, &mut diag).unwrap_err();
        assert!(matches!(err, TilesetError::ImageDecode { .. }));
    }

    #[test]
    fn format_comes_from_contents_not_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("forest.tiles");
        marked_image(512, 512)
            .save_with_format(&path, image::ImageFormat::Png)
            .expect("write png");

        let mut diag = Diagnostics::new();
        let tiles = slice_file(&path, false, &mut diag).expect("decode");
        assert_eq!(tiles.len(), 256);
        assert!(tiles.iter().all(Option::is_some));
    }
}
