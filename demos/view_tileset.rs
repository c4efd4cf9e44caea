use macroquad::prelude::*;
use tileset_forge::view::{grid_cell_at, TilesetView};
use tileset_forge::{Diagnostics, Tileset, TilesetConfig};

fn window_conf() -> Conf {
    Conf {
        window_title: "Tileset".into(),
        window_width: 1100,
        window_height: 720,
        ..Default::default()
    }
}

// cargo run --example view_tileset -- <asset_root> <definition>
#[macroquad::main(window_conf)]
async fn main() {
    let mut args = std::env::args().skip(1);
    let root = args.next().unwrap_or_else(|| ".".into());
    let definition = args.next().unwrap_or_else(|| "data/tilesets/forest.lua".into());

    let cfg = TilesetConfig::new(root);
    let mut diag = Diagnostics::new();
    let tileset = Tileset::load(&definition, &cfg, &mut diag).expect("Failed to load tileset");
    let view = TilesetView::new(&tileset);

    let origin = vec2(16.0, 16.0);
    let scale = 1.25;
    let mut show_walkability = false;

    loop {
        clear_background(BLACK);

        if is_key_pressed(KeyCode::W) {
            show_walkability = !show_walkability;
        }

        view.draw(origin, scale);
        if show_walkability {
            view.draw_walkability(&tileset, origin, scale);
        }

        let (mx, my) = mouse_position();
        if let Some(index) = grid_cell_at(vec2(mx, my) - origin, scale) {
            let index = index as u32;
            let info = format!(
                "tile {} walk {:?} group {}",
                index,
                tileset.walkability_of(index).unwrap_or_default(),
                tileset.autotile_group(index).unwrap_or("-"),
            );
            draw_text(&info, 680.0, 40.0, 22.0, WHITE);
        }
        draw_text(
            &format!("{} ({} animations) [W] walkability", tileset.name(), tileset.animations().len()),
            680.0,
            70.0,
            22.0,
            GRAY,
        );

        next_frame().await;
    }
}
