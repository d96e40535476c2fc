//! Payload decoding: csv, base64, and base64 with zlib/gzip compression

use std::io::Read;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::{GzDecoder, ZlibDecoder};

use super::{Compression, DataError, Encoding};

const WORD: usize = std::mem::size_of::<u32>();

/// The raw contents of a `<data>` or `<chunk>` element
#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<'a> {
    /// Value of the `encoding` attribute (`""` when absent)
    pub encoding: &'a str,
    /// Value of the `compression` attribute (`""` when absent)
    pub compression: &'a str,
    /// Character data of the element
    pub text: &'a str,
    /// `gid` attributes of the `<tile>` children, in document order
    pub tile_gids: &'a [u32],
}

/// Decode a payload into raw tile identifiers
///
/// Descriptors are validated before any decoding happens, encoding first.
/// The result is never empty: an empty payload is an error, not an empty
/// layer.
pub fn decode_payload(payload: &Payload<'_>) -> Result<Vec<u32>, DataError> {
    let encoding: Encoding = payload.encoding.parse()?;
    let compression: Compression = payload.compression.parse()?;

    if compression != Compression::None && encoding != Encoding::Base64 {
        return Err(DataError::CompressionRequiresBase64 {
            encoding,
            compression,
        });
    }

    match encoding {
        Encoding::None => {
            if payload.tile_gids.is_empty() {
                return Err(DataError::malformed("no <tile> elements"));
            }
            Ok(payload.tile_gids.to_vec())
        }
        Encoding::Csv => decode_csv(payload.text),
        Encoding::Base64 => {
            let bytes = STANDARD.decode(payload.text.trim())?;
            let bytes = decompress(bytes, compression)?;
            words(&bytes)
        }
    }
}

/// Parse decimal identifiers separated by commas, whitespace or newlines
///
/// An empty field is tolerated only at either end (e.g. a trailing comma);
/// an empty field between two commas is malformed.
pub fn decode_csv(text: &str) -> Result<Vec<u32>, DataError> {
    let mut fields: Vec<&str> = text.split(',').map(str::trim).collect();

    if fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    if fields.first().is_some_and(|f| f.is_empty()) {
        fields.remove(0);
    }
    if fields.is_empty() {
        return Err(DataError::malformed("empty csv payload"));
    }

    let mut gids = Vec::with_capacity(fields.len());
    for field in fields {
        if field.is_empty() {
            return Err(DataError::malformed(format!(
                "empty csv token at index {}",
                gids.len()
            )));
        }
        for token in field.split_whitespace() {
            let gid = token.parse::<u32>().map_err(|_| {
                DataError::malformed(format!(
                    "invalid csv token {:?} at index {}",
                    token,
                    gids.len()
                ))
            })?;
            gids.push(gid);
        }
    }
    Ok(gids)
}

fn decompress(bytes: Vec<u8>, compression: Compression) -> Result<Vec<u8>, DataError> {
    let mut out = Vec::new();
    let result = match compression {
        Compression::None => return Ok(bytes),
        Compression::Zlib => ZlibDecoder::new(&bytes[..]).read_to_end(&mut out),
        Compression::Gzip => GzDecoder::new(&bytes[..]).read_to_end(&mut out),
    };
    result.map_err(|source| DataError::MalformedCompressedStream {
        algorithm: compression,
        source,
    })?;
    Ok(out)
}

/// Group a byte buffer into little-endian `u32` words
fn words(bytes: &[u8]) -> Result<Vec<u32>, DataError> {
    if bytes.is_empty() || bytes.len() % WORD != 0 {
        return Err(DataError::malformed(format!(
            "decoded length {} is not a positive multiple of {}",
            bytes.len(),
            WORD
        )));
    }
    Ok(bytes
        .chunks_exact(WORD)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect())
}
