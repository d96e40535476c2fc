//! In-memory tree of a decoded TMX map
//!
//! Types mirror the TMX elements. Field layout follows the markup closely so
//! that `serde` can decode the document directly; a finalization pass (see
//! [`crate::document`]) then decodes tile payloads and normalizes shapes.

mod layer;
mod object;
mod property;
mod tileset;

pub use layer::{Chunk, Layer, LayerData, Tile};
pub use object::{Object, ObjectGroup, Point, Shape, Template, Text};
pub use property::{Property, PropertyType};
pub use tileset::{Frame, TileDefinition, TileOffset, Tileset};

use serde::Deserialize;

use crate::error::Result;
use property::deserialize_properties;

pub(crate) fn default_opacity() -> f64 {
    1.0
}

pub(crate) fn default_visible() -> bool {
    true
}

/// An `<image>` reference
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Image {
    #[serde(rename = "@source", default)]
    pub source: String,
    #[serde(rename = "@width")]
    pub width: Option<u32>,
    #[serde(rename = "@height")]
    pub height: Option<u32>,
    /// Transparent color, as a hex string without `#`
    #[serde(rename = "@trans")]
    pub trans: Option<String>,
}

/// An `<imagelayer>`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageLayer {
    #[serde(rename = "@id", default)]
    pub id: u32,
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@offsetx", default)]
    pub offset_x: f64,
    #[serde(rename = "@offsety", default)]
    pub offset_y: f64,
    #[serde(rename = "@opacity", default = "default_opacity")]
    pub opacity: f64,
    #[serde(rename = "@visible", default = "default_visible")]
    pub visible: bool,
    pub image: Option<Image>,
    #[serde(rename = "properties", default, deserialize_with = "deserialize_properties")]
    pub properties: Vec<Property>,
}

/// A `<group>` of layers; groups nest
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Group {
    #[serde(rename = "@id", default)]
    pub id: u32,
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@offsetx", default)]
    pub offset_x: f64,
    #[serde(rename = "@offsety", default)]
    pub offset_y: f64,
    #[serde(rename = "@opacity", default = "default_opacity")]
    pub opacity: f64,
    #[serde(rename = "@visible", default = "default_visible")]
    pub visible: bool,
    #[serde(rename = "properties", default, deserialize_with = "deserialize_properties")]
    pub properties: Vec<Property>,
    #[serde(rename = "layer", default)]
    pub layers: Vec<Layer>,
    #[serde(rename = "objectgroup", default)]
    pub object_groups: Vec<ObjectGroup>,
    #[serde(rename = "imagelayer", default)]
    pub image_layers: Vec<ImageLayer>,
    #[serde(rename = "group", default)]
    pub groups: Vec<Group>,
}

impl Group {
    fn finalize(&mut self, infinite: bool) -> Result<()> {
        for layer in &mut self.layers {
            layer.decode_data(infinite)?;
        }
        self.object_groups.iter_mut().try_for_each(ObjectGroup::finalize)?;
        for group in &mut self.groups {
            group.finalize(infinite)?;
        }
        Ok(())
    }
}

/// The root `<map>` element
///
/// Each kind of child keeps its own document order; the relative order of
/// different kinds is not preserved.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Map {
    #[serde(rename = "@version", default)]
    pub version: String,
    #[serde(rename = "@tiledversion")]
    pub tiled_version: Option<String>,
    #[serde(rename = "@orientation", default)]
    pub orientation: String,
    #[serde(rename = "@renderorder")]
    pub render_order: Option<String>,
    #[serde(rename = "@width", default)]
    pub width: u32,
    #[serde(rename = "@height", default)]
    pub height: u32,
    #[serde(rename = "@tilewidth", default)]
    pub tile_width: u32,
    #[serde(rename = "@tileheight", default)]
    pub tile_height: u32,
    #[serde(rename = "@infinite", default)]
    pub infinite: bool,
    #[serde(rename = "@backgroundcolor")]
    pub background_color: Option<String>,
    #[serde(rename = "@nextobjectid")]
    pub next_object_id: Option<u32>,
    #[serde(rename = "properties", default, deserialize_with = "deserialize_properties")]
    pub properties: Vec<Property>,
    #[serde(rename = "tileset", default)]
    pub tilesets: Vec<Tileset>,
    #[serde(rename = "layer", default)]
    pub layers: Vec<Layer>,
    #[serde(rename = "objectgroup", default)]
    pub object_groups: Vec<ObjectGroup>,
    #[serde(rename = "imagelayer", default)]
    pub image_layers: Vec<ImageLayer>,
    #[serde(rename = "group", default)]
    pub groups: Vec<Group>,
}

impl Map {
    /// Decode tile payloads and normalize objects across the whole tree
    pub(crate) fn finalize(&mut self) -> Result<()> {
        self.tilesets.iter_mut().try_for_each(Tileset::finalize)?;
        for layer in &mut self.layers {
            layer.decode_data(self.infinite)?;
        }
        self.object_groups.iter_mut().try_for_each(ObjectGroup::finalize)?;
        for group in &mut self.groups {
            group.finalize(self.infinite)?;
        }
        Ok(())
    }

    /// Tileset that owns a global tile id
    pub fn tileset_for_gid(&self, gid: u32) -> Option<&Tileset> {
        if gid == 0 {
            return None;
        }
        self.tilesets
            .iter()
            .filter(|t| t.first_gid <= gid)
            .max_by_key(|t| t.first_gid)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        property::find(&self.properties, name)
    }
}
