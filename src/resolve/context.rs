//! Resolution context and file sources

use std::io;
use std::path::{Path, PathBuf};

use crate::config::ParseConfig;
use crate::error::{Error, Result};

/// Where referenced documents are read from
///
/// [`FileSystem`] reads from disk; other implementations can serve files
/// from memory, an archive or an asset store.
pub trait Source {
    /// Read the whole file at `path`, which has already been joined onto the
    /// directory of the referencing document
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

impl<S: Source + ?Sized> Source for &S {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }
}

/// Reads documents from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl Source for FileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// State threaded through one resolution pass
///
/// Holds the directory of the document being processed, the chain of files
/// currently being resolved, and how many references deep this context is.
/// The root document may sit in the chain for cycle detection but does not
/// count towards the depth. A nested context is created for every loaded
/// file; nothing is shared between parses.
#[derive(Clone)]
pub struct ResolveContext<'a> {
    dir: PathBuf,
    source: &'a dyn Source,
    chain: Vec<PathBuf>,
    depth: usize,
    max_depth: usize,
}

impl<'a> ResolveContext<'a> {
    /// Create a root context resolving paths against `dir`
    pub fn new(dir: impl Into<PathBuf>, source: &'a dyn Source, config: &ParseConfig) -> Self {
        Self {
            dir: dir.into(),
            source,
            chain: Vec::new(),
            depth: 0,
            max_depth: config.max_reference_depth,
        }
    }

    /// Record the root document, so references back to it are detected
    pub fn with_document(mut self, path: impl Into<PathBuf>) -> Self {
        self.chain.push(path.into());
        self
    }

    /// Directory that relative references resolve against
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of referenced files between the root and this context
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Resolve a relative path against the current directory
    pub fn resolve_path(&self, relative: &str) -> PathBuf {
        self.dir.join(relative)
    }

    /// Read a referenced file and create the context for resolving its
    /// contents
    pub(crate) fn load(&self, relative: &str) -> Result<(PathBuf, String, ResolveContext<'a>)> {
        let path = self.resolve_path(relative);

        if self.chain.contains(&path) {
            let chain = self
                .chain
                .iter()
                .chain(std::iter::once(&path))
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(Error::CircularReference { chain });
        }
        if self.depth >= self.max_depth {
            return Err(Error::ReferenceDepthExceeded {
                path,
                depth: self.max_depth,
            });
        }

        log::debug!("loading reference {}", path.display());
        let text = self
            .source
            .read_to_string(&path)
            .map_err(|e| Error::io(path.clone(), e, true))?;

        let mut chain = self.chain.clone();
        chain.push(path.clone());
        let nested = ResolveContext {
            dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            source: self.source,
            chain,
            depth: self.depth + 1,
            max_depth: self.max_depth,
        };
        Ok((path, text, nested))
    }
}

impl std::fmt::Debug for ResolveContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveContext")
            .field("dir", &self.dir)
            .field("chain", &self.chain)
            .field("depth", &self.depth)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
