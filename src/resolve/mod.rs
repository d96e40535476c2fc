//! Reference resolution for external tilesets and object templates
//!
//! A decoded [`Map`](crate::map::Map) may point at other files: tilesets with
//! a `source` attribute and objects with a `template` attribute. Resolution
//! walks the tree depth-first, loads each referenced file relative to the
//! directory of the document that names it, resolves that file's own
//! references, and merges the result into the referencing node.
//!
//! # Example
//!
//! ```rust
//! use tmx_reader::config::ParseConfig;
//! use tmx_reader::document::decode_map;
//! use tmx_reader::resolve::{FileSystem, Resolve, ResolveContext};
//!
//! let mut map = decode_map(r#"<map width="1" height="1"/>"#).unwrap();
//! let config = ParseConfig::default();
//! let ctx = ResolveContext::new("assets", &FileSystem, &config);
//! map.resolve(&ctx).unwrap();
//! ```

mod context;
mod merge;
mod resolver;

pub use context::{FileSystem, ResolveContext, Source};
pub use merge::{merge_template, merge_tileset};
pub use resolver::Resolve;
