//! Error types for decoding and resolving tile maps

use std::path::PathBuf;

use thiserror::Error;

use crate::data::DataError;

/// Errors that can occur while loading a map
///
/// Decoding is fail-fast: the first error aborts the whole parse and no
/// partial map is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed markup, or an attribute that does not fit its field
    #[error(transparent)]
    Decode(#[from] quick_xml::DeError),

    /// Tile payload could not be decoded
    #[error(transparent)]
    Data(#[from] DataError),

    /// Well-formed markup with an invalid structure
    #[error("invalid <{element}>: {reason}")]
    InvalidElement {
        element: &'static str,
        reason: String,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A referenced tileset or template file does not exist
    #[error("referenced file not found: {}", path.display())]
    ReferenceNotFound { path: PathBuf },

    /// A referenced file exists but could not be decoded
    #[error("failed to parse referenced file {}: {source}", path.display())]
    ReferenceParse {
        path: PathBuf,
        source: Box<Error>,
    },

    /// A template or external tileset has the wrong shape
    #[error("malformed template: {reason}")]
    TemplateMalformed { reason: String },

    /// A file references itself, directly or through other files
    #[error("circular reference: {chain}")]
    CircularReference { chain: String },

    #[error("reference nesting deeper than {depth} at {}", path.display())]
    ReferenceDepthExceeded { path: PathBuf, depth: usize },
}

impl Error {
    pub(crate) fn invalid(element: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidElement {
            element,
            reason: reason.into(),
        }
    }

    pub(crate) fn template(reason: impl Into<String>) -> Self {
        Self::TemplateMalformed {
            reason: reason.into(),
        }
    }

    /// Wrap an I/O failure on `path`, mapping a missing file to
    /// [`Error::ReferenceNotFound`] when `path` is a reference target
    pub(crate) fn io(path: PathBuf, source: std::io::Error, is_reference: bool) -> Self {
        if is_reference && source.kind() == std::io::ErrorKind::NotFound {
            Self::ReferenceNotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_errors_keep_their_message() {
        let err: Error = DataError::UnknownEncoding.into();
        assert_eq!(err.to_string(), "unknown encoding");
        let err: Error = DataError::UnknownCompression.into();
        assert_eq!(err.to_string(), "unknown compression");
    }

    #[test]
    fn test_missing_reference_maps_to_not_found() {
        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = Error::io(PathBuf::from("a.tsx"), missing, true);
        assert!(matches!(err, Error::ReferenceNotFound { .. }));

        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = Error::io(PathBuf::from("map.tmx"), missing, false);
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_reference_parse_names_the_file() {
        let err = Error::ReferenceParse {
            path: PathBuf::from("tiles/holiday.tsx"),
            source: Box::new(Error::template("root element is <map>")),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse referenced file tiles/holiday.tsx: malformed template: root element is <map>"
        );
    }
}
