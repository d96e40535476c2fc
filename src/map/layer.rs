//! Tile layers and their decoded tile grids

use serde::Deserialize;

use super::property::{deserialize_properties, Property};
use super::{default_opacity, default_visible};
use crate::data::{decode_payload, DataError, Flip, Payload};
use crate::error::{Error, Result};

/// One cell of a tile layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tile {
    /// Identifier exactly as stored in the document, flip bits included
    pub raw_gid: u32,
    /// Identifier with the flip bits cleared; 0 means "no tile"
    pub gid: u32,
    pub flipping: Flip,
}

impl Tile {
    pub fn from_raw(raw_gid: u32) -> Self {
        let (gid, flipping) = Flip::decompose(raw_gid);
        Self {
            raw_gid,
            gid,
            flipping,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gid == 0
    }
}

/// Rectangular block of tiles in an infinite map
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// `width * height` tiles in row-major order
    pub tiles: Vec<Tile>,
}

impl Chunk {
    pub fn tile(&self, x: u32, y: u32) -> Option<&Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get((y * self.width + x) as usize)
    }
}

/// Decoded tile data of a layer
#[derive(Debug, Clone, PartialEq)]
pub enum LayerData {
    /// Finite map: `width * height` tiles in row-major order
    Tiles(Vec<Tile>),
    /// Infinite map: independently positioned chunks
    Chunks(Vec<Chunk>),
}

impl Default for LayerData {
    fn default() -> Self {
        LayerData::Tiles(Vec::new())
    }
}

impl LayerData {
    pub fn tiles(&self) -> Option<&[Tile]> {
        match self {
            LayerData::Tiles(tiles) => Some(tiles),
            LayerData::Chunks(_) => None,
        }
    }

    pub fn chunks(&self) -> Option<&[Chunk]> {
        match self {
            LayerData::Tiles(_) => None,
            LayerData::Chunks(chunks) => Some(chunks),
        }
    }

    /// Every tile of the layer, chunk by chunk for infinite maps
    pub fn iter(&self) -> Box<dyn Iterator<Item = &Tile> + '_> {
        match self {
            LayerData::Tiles(tiles) => Box::new(tiles.iter()),
            LayerData::Chunks(chunks) => Box::new(chunks.iter().flat_map(|c| c.tiles.iter())),
        }
    }
}

/// A `<layer>` element
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Layer {
    #[serde(rename = "@id", default)]
    pub id: u32,
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@width", default)]
    pub width: u32,
    #[serde(rename = "@height", default)]
    pub height: u32,
    #[serde(rename = "@opacity", default = "default_opacity")]
    pub opacity: f64,
    #[serde(rename = "@visible", default = "default_visible")]
    pub visible: bool,
    #[serde(rename = "@offsetx", default)]
    pub offset_x: f64,
    #[serde(rename = "@offsety", default)]
    pub offset_y: f64,
    #[serde(rename = "properties", default, deserialize_with = "deserialize_properties")]
    pub properties: Vec<Property>,

    #[serde(rename = "data")]
    raw_data: Option<RawData>,

    #[serde(skip)]
    pub data: LayerData,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
struct RawData {
    #[serde(rename = "@encoding", default)]
    encoding: String,
    #[serde(rename = "@compression", default)]
    compression: String,
    #[serde(rename = "$text", default)]
    text: String,
    #[serde(rename = "tile", default)]
    tiles: Vec<RawTile>,
    #[serde(rename = "chunk", default)]
    chunks: Vec<RawChunk>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct RawTile {
    #[serde(rename = "@gid", default)]
    gid: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct RawChunk {
    #[serde(rename = "@x", default)]
    x: i32,
    #[serde(rename = "@y", default)]
    y: i32,
    #[serde(rename = "@width", default)]
    width: u32,
    #[serde(rename = "@height", default)]
    height: u32,
    #[serde(rename = "$text", default)]
    text: String,
    #[serde(rename = "tile", default)]
    tiles: Vec<RawTile>,
}

impl RawData {
    fn payload<'a>(&'a self, text: &'a str, gids: &'a [u32]) -> Payload<'a> {
        Payload {
            encoding: &self.encoding,
            compression: &self.compression,
            text,
            tile_gids: gids,
        }
    }
}

fn gids(tiles: &[RawTile]) -> Vec<u32> {
    tiles.iter().map(|t| t.gid).collect()
}

fn expect_count(gids: &[u32], width: u32, height: u32, what: &str) -> Result<(), DataError> {
    let expected = width as u64 * height as u64;
    if gids.len() as u64 != expected {
        return Err(DataError::malformed(format!(
            "{} declares {}x{} = {} tiles but contains {}",
            what,
            width,
            height,
            expected,
            gids.len()
        )));
    }
    Ok(())
}

impl Layer {
    /// Decode the raw `<data>` element into [`Layer::data`]
    ///
    /// Layers in infinite maps, and any layer whose data holds `<chunk>`
    /// elements, decode chunk by chunk; everything else decodes as one grid
    /// that must hold exactly `width * height` tiles.
    pub(crate) fn decode_data(&mut self, infinite: bool) -> Result<()> {
        let raw = self.raw_data.take();
        let chunked = infinite || raw.as_ref().is_some_and(|r| !r.chunks.is_empty());

        let Some(raw) = raw else {
            if chunked {
                self.data = LayerData::Chunks(Vec::new());
                return Ok(());
            }
            return Err(Error::invalid(
                "layer",
                format!("layer '{}' has no <data> element", self.name),
            ));
        };

        if chunked {
            if !raw.text.trim().is_empty() || !raw.tiles.is_empty() {
                return Err(Error::invalid(
                    "data",
                    format!("layer '{}' mixes chunks with inline tile data", self.name),
                ));
            }
            let mut chunks = Vec::with_capacity(raw.chunks.len());
            for chunk in &raw.chunks {
                if chunk.width == 0 || chunk.height == 0 {
                    return Err(DataError::malformed(format!(
                        "chunk at ({}, {}) in layer '{}' has zero area",
                        chunk.x, chunk.y, self.name
                    ))
                    .into());
                }
                let tile_gids = gids(&chunk.tiles);
                let decoded = decode_payload(&raw.payload(&chunk.text, &tile_gids))?;
                let what = format!("chunk at ({}, {}) in layer '{}'", chunk.x, chunk.y, self.name);
                expect_count(&decoded, chunk.width, chunk.height, &what)?;
                chunks.push(Chunk {
                    x: chunk.x,
                    y: chunk.y,
                    width: chunk.width,
                    height: chunk.height,
                    tiles: decoded.into_iter().map(Tile::from_raw).collect(),
                });
            }
            log::trace!("layer '{}': decoded {} chunks", self.name, chunks.len());
            self.data = LayerData::Chunks(chunks);
        } else {
            let tile_gids = gids(&raw.tiles);
            let decoded = decode_payload(&raw.payload(&raw.text, &tile_gids))?;
            expect_count(&decoded, self.width, self.height, &format!("layer '{}'", self.name))?;
            log::trace!(
                "layer '{}': decoded {} tiles ({} encoding)",
                self.name,
                decoded.len(),
                if raw.encoding.is_empty() { "xml" } else { &raw.encoding }
            );
            self.data = LayerData::Tiles(decoded.into_iter().map(Tile::from_raw).collect());
        }
        Ok(())
    }

    /// Tile at a grid position of a finite layer
    pub fn tile(&self, x: u32, y: u32) -> Option<&Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.tiles()?.get((y * self.width + x) as usize)
    }
}
