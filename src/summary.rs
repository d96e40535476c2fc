//! Plain-text overview of a decoded map
//!
//! Used by the command-line tool. Output is deterministic: elements are
//! listed kind by kind, each kind in document order.

use crate::map::{Group, ImageLayer, Layer, LayerData, Map, Object, ObjectGroup, Tileset};

/// Summarize a map: its size, tilesets, and each layer with its non-empty
/// tile count or its objects
pub fn summarize(map: &Map) -> String {
    let mut lines = vec![format!(
        "map {}x{} {}, {}x{} tiles, {}",
        map.width,
        map.height,
        if map.orientation.is_empty() {
            "orthogonal"
        } else {
            map.orientation.as_str()
        },
        map.tile_width,
        map.tile_height,
        if map.infinite { "infinite" } else { "finite" }
    )];

    lines.extend(map.tilesets.iter().map(tileset_line));
    layers(
        &mut lines,
        0,
        &map.layers,
        &map.object_groups,
        &map.image_layers,
        &map.groups,
    );

    lines.join("\n")
}

fn tileset_line(tileset: &Tileset) -> String {
    if tileset.is_external() && !tileset.is_resolved() {
        return format!(
            "tileset {} -> {} (unresolved)",
            tileset.first_gid,
            tileset.source.as_deref().unwrap_or_default()
        );
    }

    let mut line = format!(
        "tileset {} \"{}\" {}x{}, {} tiles",
        tileset.first_gid, tileset.name, tileset.tile_width, tileset.tile_height, tileset.tile_count
    );
    if let Some(source) = &tileset.source {
        line.push_str(&format!(" ({})", source));
    }
    line
}

fn layers(
    lines: &mut Vec<String>,
    depth: usize,
    tile_layers: &[Layer],
    object_groups: &[ObjectGroup],
    image_layers: &[ImageLayer],
    groups: &[Group],
) {
    let indent = "  ".repeat(depth);

    for layer in tile_layers {
        let filled = layer.data.iter().filter(|t| !t.is_empty()).count();
        let extent = match &layer.data {
            LayerData::Tiles(_) => format!("{}x{}", layer.width, layer.height),
            LayerData::Chunks(chunks) => format!("{} chunks", chunks.len()),
        };
        lines.push(format!(
            "{}layer {} \"{}\" {}: {} non-empty",
            indent, layer.id, layer.name, extent, filled
        ));
    }

    for group in object_groups {
        lines.push(format!(
            "{}objectgroup {} \"{}\": {} objects",
            indent,
            group.id,
            group.name,
            group.objects.len()
        ));
        for object in &group.objects {
            lines.push(format!("{}  {}", indent, object_line(object)));
        }
    }

    for image_layer in image_layers {
        let mut line = format!("{}imagelayer {} \"{}\"", indent, image_layer.id, image_layer.name);
        if let Some(image) = &image_layer.image {
            line.push_str(&format!(" ({})", image.source));
        }
        lines.push(line);
    }

    for group in groups {
        lines.push(format!("{}group {} \"{}\"", indent, group.id, group.name));
        layers(
            lines,
            depth + 1,
            &group.layers,
            &group.object_groups,
            &group.image_layers,
            &group.groups,
        );
    }
}

fn object_line(object: &Object) -> String {
    let kind = if object.text.is_some() {
        "text".to_string()
    } else if let Some(shape) = &object.shape {
        shape.name().to_string()
    } else if let Some(gid) = object.gid {
        format!("tile {}", gid)
    } else {
        "rect".to_string()
    };

    let mut line = format!("object {} \"{}\" {}", object.id, object.name, kind);
    if let (Some(width), Some(height)) = (object.width, object.height) {
        line.push_str(&format!(" {}x{}", width, height));
    }
    line.push_str(&format!(" at ({}, {})", object.x, object.y));
    line
}
