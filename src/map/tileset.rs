//! Tilesets, embedded or referenced from an external `.tsx` file

use serde::{Deserialize, Deserializer};

use super::object::ObjectGroup;
use super::property::{deserialize_properties, Property};
use super::Image;
use crate::error::Result;

/// Drawing offset applied to every tile of a tileset
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct TileOffset {
    #[serde(rename = "@x", default)]
    pub x: i32,
    #[serde(rename = "@y", default)]
    pub y: i32,
}

/// One frame of a tile animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Frame {
    #[serde(rename = "@tileid")]
    pub tile_id: u32,
    /// Milliseconds
    #[serde(rename = "@duration")]
    pub duration: u32,
}

fn deserialize_animation<'de, D>(deserializer: D) -> Result<Vec<Frame>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Animation {
        #[serde(rename = "frame", default)]
        frames: Vec<Frame>,
    }

    Animation::deserialize(deserializer).map(|a| a.frames)
}

/// Per-tile metadata inside a tileset
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TileDefinition {
    /// Local id within the tileset (GID minus `firstgid`)
    #[serde(rename = "@id")]
    pub id: u32,
    #[serde(rename = "@type", alias = "@class")]
    pub kind: Option<String>,
    #[serde(rename = "@probability")]
    pub probability: Option<f64>,
    pub image: Option<Image>,
    #[serde(rename = "properties", default, deserialize_with = "deserialize_properties")]
    pub properties: Vec<Property>,
    /// Collision shapes
    #[serde(rename = "objectgroup")]
    pub object_group: Option<ObjectGroup>,
    #[serde(rename = "animation", default, deserialize_with = "deserialize_animation")]
    pub animation: Vec<Frame>,
}

/// A `<tileset>` element
///
/// A tileset in a map either embeds its content or only carries `firstgid`
/// and a `source` path. Once the source is resolved, the loaded content is
/// merged in while `firstgid` and `source` keep the map's values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tileset {
    #[serde(rename = "@firstgid", default)]
    pub first_gid: u32,
    /// Path of the external `.tsx` file
    #[serde(rename = "@source")]
    pub source: Option<String>,
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@tilewidth", default)]
    pub tile_width: u32,
    #[serde(rename = "@tileheight", default)]
    pub tile_height: u32,
    #[serde(rename = "@spacing", default)]
    pub spacing: u32,
    #[serde(rename = "@margin", default)]
    pub margin: u32,
    #[serde(rename = "@tilecount", default)]
    pub tile_count: u32,
    #[serde(rename = "@columns", default)]
    pub columns: u32,
    #[serde(rename = "tileoffset")]
    pub tile_offset: Option<TileOffset>,
    pub image: Option<Image>,
    #[serde(rename = "properties", default, deserialize_with = "deserialize_properties")]
    pub properties: Vec<Property>,
    #[serde(rename = "tile", default)]
    pub tiles: Vec<TileDefinition>,

    #[serde(skip)]
    pub(crate) source_resolved: bool,
}

impl Tileset {
    pub(crate) fn finalize(&mut self) -> Result<()> {
        for tile in &mut self.tiles {
            if let Some(group) = &mut tile.object_group {
                group.finalize()?;
            }
        }
        Ok(())
    }

    /// Whether this tileset only points at an external file
    pub fn is_external(&self) -> bool {
        self.source.is_some()
    }

    /// Whether the external source has already been merged in
    pub fn is_resolved(&self) -> bool {
        self.source_resolved
    }

    /// Whether a global tile id falls inside this tileset
    pub fn contains_gid(&self, gid: u32) -> bool {
        gid >= self.first_gid && gid - self.first_gid < self.tile_count
    }

    pub fn tile(&self, local_id: u32) -> Option<&TileDefinition> {
        self.tiles.iter().find(|t| t.id == local_id)
    }
}
