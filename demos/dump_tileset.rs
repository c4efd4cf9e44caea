use anyhow::Context;
use tileset_forge::{Diagnostics, Tileset, TilesetConfig, TilesetSummary};
use tracing_subscriber::EnvFilter;

// cargo run --example dump_tileset -- <asset_root> <definition> [--one-image]
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let root = args.first().context("usage: dump_tileset <asset_root> <definition>")?;
    let definition = args.get(1).context("missing definition path")?;
    let one_image = args.iter().any(|a| a == "--one-image");

    let cfg = TilesetConfig::new(root).with_one_image(one_image);
    let mut diag = Diagnostics::verbose();
    let tileset = Tileset::load(definition, &cfg, &mut diag)
        .with_context(|| format!("Loading tileset {}", definition))?;

    println!("{}", TilesetSummary::from(&tileset).to_json()?);
    if diag.has_warnings() {
        eprintln!("{} warning(s) while loading", diag.warnings().len());
    }
    Ok(())
}
