//! Objects, object groups and templates

use serde::Deserialize;

use super::property::{deserialize_properties, Property};
use super::tileset::Tileset;
use super::{default_opacity, default_visible};
use crate::error::{Error, Result};

/// A vertex of a polygon or polyline, relative to the object's position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Shape marker of an object; an object without one is a rectangle
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Ellipse,
    Point,
    Polygon(Vec<Point>),
    Polyline(Vec<Point>),
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Ellipse => "ellipse",
            Shape::Point => "point",
            Shape::Polygon(_) => "polygon",
            Shape::Polyline(_) => "polyline",
        }
    }
}

/// Text content of a text object
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Text {
    #[serde(rename = "@fontfamily")]
    pub font_family: Option<String>,
    #[serde(rename = "@pixelsize")]
    pub pixel_size: Option<u32>,
    #[serde(rename = "@wrap", default)]
    pub wrap: bool,
    #[serde(rename = "@color")]
    pub color: Option<String>,
    #[serde(rename = "@bold", default)]
    pub bold: bool,
    #[serde(rename = "@italic", default)]
    pub italic: bool,
    #[serde(rename = "@halign")]
    pub halign: Option<String>,
    #[serde(rename = "@valign")]
    pub valign: Option<String>,
    #[serde(rename = "$text", default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Marker {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct PointList {
    #[serde(rename = "@points", default)]
    points: String,
}

/// An `<object>`
///
/// Every attribute a template may supply is optional so that an explicit
/// value (including zero) is never mistaken for an absent one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Object {
    #[serde(rename = "@id", default)]
    pub id: u32,
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@type", alias = "@class")]
    pub kind: Option<String>,
    #[serde(rename = "@x", default)]
    pub x: f64,
    #[serde(rename = "@y", default)]
    pub y: f64,
    #[serde(rename = "@width")]
    pub width: Option<f64>,
    #[serde(rename = "@height")]
    pub height: Option<f64>,
    #[serde(rename = "@rotation")]
    pub rotation: Option<f64>,
    #[serde(rename = "@gid")]
    pub gid: Option<u32>,
    #[serde(rename = "@visible")]
    pub visible: Option<bool>,
    /// Path of the `.tx` template this object instantiates
    #[serde(rename = "@template")]
    pub template: Option<String>,
    #[serde(rename = "properties", default, deserialize_with = "deserialize_properties")]
    pub properties: Vec<Property>,

    #[serde(rename = "text", default)]
    raw_text: Vec<Text>,
    #[serde(rename = "ellipse", default)]
    raw_ellipse: Vec<Marker>,
    #[serde(rename = "point", default)]
    raw_point: Vec<Marker>,
    #[serde(rename = "polygon", default)]
    raw_polygon: Vec<PointList>,
    #[serde(rename = "polyline", default)]
    raw_polyline: Vec<PointList>,

    #[serde(skip)]
    pub text: Option<Text>,
    #[serde(skip)]
    pub shape: Option<Shape>,
    /// Tileset supplied by the template, for tile objects
    #[serde(skip)]
    pub tileset: Option<Box<Tileset>>,
    #[serde(skip)]
    pub(crate) template_resolved: bool,
}

impl Object {
    /// Turn the raw shape and text children into [`Object::shape`] and
    /// [`Object::text`]; at most one of each is allowed
    pub(crate) fn finalize(&mut self) -> Result<()> {
        let texts = std::mem::take(&mut self.raw_text);
        if texts.len() > 1 {
            return Err(Error::invalid(
                "object",
                format!("object {} has {} <text> elements", self.id, texts.len()),
            ));
        }
        self.text = texts.into_iter().next();

        let mut shapes = Vec::new();
        shapes.extend(std::mem::take(&mut self.raw_ellipse).into_iter().map(|_| Shape::Ellipse));
        shapes.extend(std::mem::take(&mut self.raw_point).into_iter().map(|_| Shape::Point));
        for list in std::mem::take(&mut self.raw_polygon) {
            shapes.push(Shape::Polygon(parse_points(&list.points)?));
        }
        for list in std::mem::take(&mut self.raw_polyline) {
            shapes.push(Shape::Polyline(parse_points(&list.points)?));
        }
        if shapes.len() > 1 {
            let names: Vec<&str> = shapes.iter().map(Shape::name).collect();
            return Err(Error::invalid(
                "object",
                format!("object {} has several shapes: {}", self.id, names.join(", ")),
            ));
        }
        self.shape = shapes.pop();
        Ok(())
    }

    /// Whether the template reference has already been merged in
    pub fn is_resolved(&self) -> bool {
        self.template_resolved
    }

    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        super::property::find(&self.properties, name)
    }
}

/// Parse a `points` attribute of the form `"x1,y1 x2,y2 ..."`
fn parse_points(points: &str) -> Result<Vec<Point>> {
    let bad = || Error::invalid("object", format!("malformed point list {:?}", points));
    let parsed = points
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair.split_once(',').ok_or_else(bad)?;
            Ok(Point {
                x: x.parse().map_err(|_| bad())?,
                y: y.parse().map_err(|_| bad())?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if parsed.is_empty() {
        return Err(bad());
    }
    Ok(parsed)
}

/// An `<objectgroup>`, either a map layer or a tile's collision shapes
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectGroup {
    #[serde(rename = "@id", default)]
    pub id: u32,
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@color")]
    pub color: Option<String>,
    #[serde(rename = "@opacity", default = "default_opacity")]
    pub opacity: f64,
    #[serde(rename = "@visible", default = "default_visible")]
    pub visible: bool,
    #[serde(rename = "@offsetx", default)]
    pub offset_x: f64,
    #[serde(rename = "@offsety", default)]
    pub offset_y: f64,
    #[serde(rename = "@draworder")]
    pub draw_order: Option<String>,
    #[serde(rename = "properties", default, deserialize_with = "deserialize_properties")]
    pub properties: Vec<Property>,
    #[serde(rename = "object", default)]
    pub objects: Vec<Object>,
}

impl ObjectGroup {
    pub(crate) fn finalize(&mut self) -> Result<()> {
        self.objects.iter_mut().try_for_each(Object::finalize)
    }
}

/// Contents of a `.tx` template file
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Template {
    #[serde(rename = "tileset", default)]
    pub tilesets: Vec<Tileset>,
    #[serde(rename = "object", default)]
    pub objects: Vec<Object>,
}

impl Template {
    pub(crate) fn finalize(&mut self) -> Result<()> {
        self.tilesets.iter_mut().try_for_each(Tileset::finalize)?;
        self.objects.iter_mut().try_for_each(Object::finalize)
    }
}
