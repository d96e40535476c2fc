//! TMX Reader - A decoder for Tiled `.tmx` tile maps
//!
//! This library decodes a map document into a typed tree, decodes layer tile
//! payloads (XML, CSV, base64 with optional zlib or gzip compression), splits
//! flip flags from tile ids, and merges external tilesets (`.tsx`) and object
//! templates (`.tx`) into the map.
//!
//! # Example
//!
//! ```rust
//! use tmx_reader::parse;
//!
//! let map = parse(
//!     r#"<map version="1.10" orientation="orthogonal" width="2" height="1" tilewidth="16" tileheight="16">
//!  <layer id="1" name="Ground" width="2" height="1">
//!   <data encoding="csv">1,2147483650</data>
//!  </layer>
//! </map>"#,
//!     ".",
//! )
//! .unwrap();
//!
//! let tiles = map.layers[0].data.tiles().unwrap();
//! assert_eq!(tiles[1].gid, 2);
//! assert!(tiles[1].flipping.horizontal());
//! ```

pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod map;
pub mod resolve;
pub mod summary;

pub use config::{ConfigError, ParseConfig};
pub use data::{DataError, Flip};
pub use error::{Error, Result};
pub use map::Map;
pub use resolve::{FileSystem, Resolve, ResolveContext, Source};
pub use summary::summarize;

use std::path::Path;

/// Parses maps through a [`Source`] with a fixed configuration
///
/// The free functions [`load`] and [`parse`] use a `Loader` over the local
/// filesystem. Use [`Loader::with_source`] to read referenced files from
/// somewhere else.
///
/// # Example
///
/// ```rust
/// use tmx_reader::{Loader, ParseConfig};
///
/// let loader = Loader::new().with_config(ParseConfig::new().with_resolve_references(false));
/// let map = loader
///     .parse_str(r#"<map><tileset firstgid="1" source="missing.tsx"/></map>"#, "assets")
///     .unwrap();
/// assert_eq!(map.tilesets[0].source.as_deref(), Some("missing.tsx"));
/// assert!(!map.tilesets[0].is_resolved());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader<S = FileSystem> {
    source: S,
    config: ParseConfig,
}

impl Loader<FileSystem> {
    /// Create a loader reading from the local filesystem
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Source> Loader<S> {
    /// Create a loader reading every document from `source`
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            config: ParseConfig::default(),
        }
    }

    /// Set the parse configuration
    pub fn with_config(mut self, config: ParseConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Read and parse the map at `path`; references resolve against the
    /// directory containing it
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Map> {
        let path = path.as_ref();
        let text = self
            .source
            .read_to_string(path)
            .map_err(|e| Error::io(path.to_path_buf(), e, false))?;
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        self.parse_document(&text, dir, Some(path))
    }

    /// Parse an in-memory map; references resolve against `base_dir`
    pub fn parse_str(&self, source: &str, base_dir: impl AsRef<Path>) -> Result<Map> {
        self.parse_document(source, base_dir.as_ref(), None)
    }

    fn parse_document(&self, source: &str, dir: &Path, path: Option<&Path>) -> Result<Map> {
        let mut map = document::decode_map(source)?;

        if !self.config.resolve_references {
            log::debug!("reference resolution disabled");
            return Ok(map);
        }

        let mut ctx = ResolveContext::new(dir, &self.source, &self.config);
        if let Some(path) = path {
            ctx = ctx.with_document(path);
        }
        map.resolve(&ctx)?;
        Ok(map)
    }
}

/// Load a map from disk with default configuration
///
/// This is the main entry point for the library. It reads the file, decodes
/// every layer and merges all referenced tilesets and templates.
pub fn load(path: impl AsRef<Path>) -> Result<Map> {
    load_with_config(path, &ParseConfig::default())
}

/// Load a map from disk with custom configuration
pub fn load_with_config(path: impl AsRef<Path>, config: &ParseConfig) -> Result<Map> {
    let path = path.as_ref();
    log::info!("loading map {}", path.display());
    Loader::new().with_config(config.clone()).load_file(path)
}

/// Parse an in-memory map with default configuration
///
/// `base_dir` is the directory that `source` and `template` attributes are
/// relative to.
pub fn parse(source: &str, base_dir: impl AsRef<Path>) -> Result<Map> {
    parse_with_config(source, base_dir, &ParseConfig::default())
}

/// Parse an in-memory map with custom configuration
///
/// # Example
///
/// ```rust
/// use tmx_reader::{parse_with_config, ParseConfig};
///
/// let config = ParseConfig::new().with_max_reference_depth(4);
/// let map = parse_with_config(r#"<map width="10" height="10"/>"#, ".", &config).unwrap();
/// assert_eq!(map.width, 10);
/// ```
pub fn parse_with_config(
    source: &str,
    base_dir: impl AsRef<Path>,
    config: &ParseConfig,
) -> Result<Map> {
    let base_dir = base_dir.as_ref();
    log::info!("parsing map relative to {}", base_dir.display());
    Loader::new().with_config(config.clone()).parse_str(source, base_dir)
}
