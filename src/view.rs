//! Macroquad binding for a loaded [`Tileset`]. The model itself knows nothing
//! about rendering; this adapter uploads its tiles and draws the grid.

use macroquad::prelude::*;

use crate::config::{GRID_COLS, GRID_ROWS, TILE_HEIGHT, TILE_WIDTH};
use crate::tileset::Tileset;

/// Tile index under `local` (pixels relative to the grid's top-left corner)
/// when the grid is drawn at `scale`.
pub fn grid_cell_at(local: Vec2, scale: f32) -> Option<usize> {
    if local.x < 0.0 || local.y < 0.0 || scale <= 0.0 {
        return None;
    }
    let col = (local.x / (TILE_WIDTH as f32 * scale)) as u32;
    let row = (local.y / (TILE_HEIGHT as f32 * scale)) as u32;
    if col < GRID_COLS && row < GRID_ROWS {
        Some((row * GRID_COLS + col) as usize)
    } else {
        None
    }
}

/// GPU textures for every tile of a tileset.
pub struct TilesetView {
    textures: Vec<Option<Texture2D>>,
}

impl TilesetView {
    /// Uploads the tileset's tiles. Needs a live macroquad context.
    pub fn new(tileset: &Tileset) -> Self {
        let textures = tileset
            .tiles()
            .iter()
            .map(|slot| {
                slot.as_ref().map(|img| {
                    let tex = Texture2D::from_rgba8(
                        img.width() as u16,
                        img.height() as u16,
                        img.as_raw(),
                    );
                    tex.set_filter(FilterMode::Nearest);
                    tex
                })
            })
            .collect();
        Self { textures }
    }

    /// Texture of tile `index`; `None` for blank slots.
    pub fn texture(&self, index: usize) -> Option<&Texture2D> {
        self.textures.get(index).and_then(Option::as_ref)
    }

    /// Draws the 16x16 grid with its top-left corner at `origin`.
    pub fn draw(&self, origin: Vec2, scale: f32) {
        let tw = TILE_WIDTH as f32 * scale;
        let th = TILE_HEIGHT as f32 * scale;

        if let [Some(whole)] = self.textures.as_slice() {
            draw_texture_ex(
                whole,
                origin.x,
                origin.y,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(whole.width() * scale, whole.height() * scale)),
                    ..Default::default()
                },
            );
            return;
        }

        for (i, slot) in self.textures.iter().enumerate() {
            let col = (i as u32 % GRID_COLS) as f32;
            let row = (i as u32 / GRID_COLS) as f32;
            let x = origin.x + col * tw;
            let y = origin.y + row * th;
            match slot {
                Some(tex) => draw_texture_ex(
                    tex,
                    x,
                    y,
                    WHITE,
                    DrawTextureParams {
                        dest_size: Some(vec2(tw, th)),
                        ..Default::default()
                    },
                ),
                None => draw_rectangle_lines(x, y, tw, th, 1.0, DARKGRAY),
            }
        }
    }

    /// Shades the blocked quadrants of every tile.
    pub fn draw_walkability(&self, tileset: &Tileset, origin: Vec2, scale: f32) {
        let qw = TILE_WIDTH as f32 * scale / 2.0;
        let qh = TILE_HEIGHT as f32 * scale / 2.0;
        let shade = Color::new(1.0, 0.0, 0.0, 0.35);

        for (&index, quadrants) in tileset.walkability() {
            let col = (index % GRID_COLS) as f32;
            let row = (index / GRID_COLS) as f32;
            for (q, &code) in quadrants.iter().enumerate() {
                if code == 0 {
                    continue;
                }
                let x = origin.x + col * qw * 2.0 + (q % 2) as f32 * qw;
                let y = origin.y + row * qh * 2.0 + (q / 2) as f32 * qh;
                draw_rectangle(x, y, qw, qh, shade);
            }
        }
    }
}
