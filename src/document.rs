//! Document decoding: markup to typed tree
//!
//! Each decoder checks the root element, lets `serde` map the markup onto the
//! types in [`crate::map`], then runs the finalization pass that decodes tile
//! payloads and normalizes object shapes. No references are followed here.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::map::{Map, Template, Tileset};

/// Decode a `.tmx` document
pub fn decode_map(source: &str) -> Result<Map> {
    let root = root_element(source)?;
    if root != "map" {
        return Err(Error::invalid(
            "map",
            format!("expected root element <map>, found <{}>", root),
        ));
    }
    let mut map: Map = quick_xml::de::from_str(source)?;
    map.finalize()?;
    Ok(map)
}

/// Decode a `.tsx` document; its root must be a single `<tileset>`
pub fn decode_tileset(source: &str) -> Result<Tileset> {
    let root = root_element(source)?;
    if root != "tileset" {
        return Err(Error::template(format!(
            "external tileset must have a <tileset> root, found <{}>",
            root
        )));
    }
    let mut tileset: Tileset = quick_xml::de::from_str(source)?;
    tileset.finalize()?;
    Ok(tileset)
}

/// Decode a `.tx` document; its root must be `<template>`
///
/// The object count is checked when the template is merged, not here.
pub fn decode_template(source: &str) -> Result<Template> {
    let root = root_element(source)?;
    if root != "template" {
        return Err(Error::template(format!(
            "template must have a <template> root, found <{}>",
            root
        )));
    }
    let mut template: Template = quick_xml::de::from_str(source)?;
    template.finalize()?;
    Ok(template)
}

/// Local name of the first element in the document
fn root_element(source: &str) -> Result<String> {
    let mut reader = Reader::from_str(source);
    loop {
        match reader.read_event().map_err(quick_xml::DeError::from)? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Event::Eof => return Err(Error::invalid("document", "no root element")),
            _ => {}
        }
    }
}
