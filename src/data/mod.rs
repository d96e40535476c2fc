//! Tile payload decoding
//!
//! Turns the contents of a `<data>` (or `<chunk>`) element into an ordered
//! sequence of raw tile identifiers, and splits each identifier into a clean
//! GID plus flip flags.

mod decode;
mod encoding;
mod flip;

pub use decode::{decode_csv, decode_payload, Payload};
pub use encoding::{Compression, Encoding};
pub use flip::{Flip, GID_MASK};

use thiserror::Error;

/// Errors produced while decoding tile data
#[derive(Debug, Error)]
pub enum DataError {
    /// `encoding` attribute outside `{"", "csv", "base64"}`
    #[error("unknown encoding")]
    UnknownEncoding,

    /// `compression` attribute outside `{"", "zlib", "gzip"}`
    #[error("unknown compression")]
    UnknownCompression,

    /// Compression was requested for a payload that is not base64
    #[error("{compression} compression requires base64 encoding, found {encoding}")]
    CompressionRequiresBase64 {
        encoding: Encoding,
        compression: Compression,
    },

    #[error("malformed base64 tile data: {0}")]
    MalformedBase64(#[from] base64::DecodeError),

    #[error("malformed {algorithm} stream: {source}")]
    MalformedCompressedStream {
        algorithm: Compression,
        source: std::io::Error,
    },

    /// Wrong token/byte count, or a tile count that does not match the grid
    #[error("empty or malformed tile data: {reason}")]
    EmptyOrMalformedTileData { reason: String },
}

impl DataError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::EmptyOrMalformedTileData {
            reason: reason.into(),
        }
    }
}
