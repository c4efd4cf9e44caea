use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tileset::{AnimatedTile, Quadrants, Tileset, WALKABLE};

/// Serializable snapshot of a tileset's metadata, for tooling that wants JSON
/// rather than the definition script.
///
/// Walkability lists only tiles that are not fully walkable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetSummary {
    /// Tileset name.
    pub name: String,
    /// Image path relative to the asset root.
    pub image: String,
    /// Definition path relative to the asset root.
    pub definition: String,
    /// Number of tile slots.
    pub tile_count: usize,
    /// Slots that could not be cut from the image.
    pub blank_tiles: Vec<usize>,
    /// Tiles with at least one blocked quadrant.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub blocked: BTreeMap<u32, Quadrants>,
    /// Autotile group per tile.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub autotiling: BTreeMap<u32, String>,
    /// Animation sequences.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub animated_tiles: Vec<Vec<AnimatedTile>>,
}

impl From<&Tileset> for TilesetSummary {
    fn from(ts: &Tileset) -> Self {
        TilesetSummary {
            name: ts.name().to_owned(),
            image: ts.image_path().to_owned(),
            definition: ts.definition_path().to_owned(),
            tile_count: ts.tile_count(),
            blank_tiles: ts
                .tiles()
                .iter()
                .enumerate()
                .filter(|(_, t)| t.is_none())
                .map(|(i, _)| i)
                .collect(),
            blocked: ts
                .walkability()
                .iter()
                .filter(|(_, q)| **q != WALKABLE)
                .map(|(i, q)| (*i, *q))
                .collect(),
            autotiling: ts.autotileability().clone(),
            animated_tiles: ts.animations().to_vec(),
        }
    }
}

impl TilesetSummary {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_skips_empty_sections() {
        let mut ts = Tileset::empty();
        ts.name = "forest".into();
        ts.fill_default_walkability();
        ts.set_walkability(7, [1, 1, 1, 1]).expect("in range");

        let summary = TilesetSummary::from(&ts);
        let json = summary.to_json().expect("serialize");
        assert!(json.contains("\"blocked\""));
        assert!(!json.contains("autotiling"));
        assert!(!json.contains("animated_tiles"));

        let back: TilesetSummary = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, summary);
        assert_eq!(back.blocked.get(&7), Some(&[1, 1, 1, 1]));
    }
}
