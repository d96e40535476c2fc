//! Encoding and compression descriptors of a `<data>` element

use std::fmt;
use std::str::FromStr;

use super::DataError;

/// How tile identifiers are written inside `<data>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// One `<tile gid="..."/>` child per tile
    #[default]
    None,
    /// Comma separated decimal identifiers
    Csv,
    /// Little-endian `u32` words, base64 encoded
    Base64,
}

impl FromStr for Encoding {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Encoding::None),
            "csv" => Ok(Encoding::Csv),
            "base64" => Ok(Encoding::Base64),
            _ => Err(DataError::UnknownEncoding),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::None => "xml",
            Encoding::Csv => "csv",
            Encoding::Base64 => "base64",
        })
    }
}

/// Compression applied to base64 payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    Zlib,
    Gzip,
}

impl FromStr for Compression {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Compression::None),
            "zlib" => Ok(Compression::Zlib),
            "gzip" => Ok(Compression::Gzip),
            _ => Err(DataError::UnknownCompression),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Compression::None => "none",
            Compression::Zlib => "zlib",
            Compression::Gzip => "gzip",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_descriptors() {
        assert_eq!("".parse::<Encoding>().unwrap(), Encoding::None);
        assert_eq!("csv".parse::<Encoding>().unwrap(), Encoding::Csv);
        assert_eq!("base64".parse::<Encoding>().unwrap(), Encoding::Base64);
        assert_eq!("".parse::<Compression>().unwrap(), Compression::None);
        assert_eq!("zlib".parse::<Compression>().unwrap(), Compression::Zlib);
        assert_eq!("gzip".parse::<Compression>().unwrap(), Compression::Gzip);
    }

    #[test]
    fn test_unknown_descriptors_are_rejected() {
        let err = "base32".parse::<Encoding>().unwrap_err();
        assert_eq!(err.to_string(), "unknown encoding");
        let err = "zstd".parse::<Compression>().unwrap_err();
        assert_eq!(err.to_string(), "unknown compression");
    }

    #[test]
    fn test_descriptors_are_case_sensitive() {
        assert!("CSV".parse::<Encoding>().is_err());
        assert!("Zlib".parse::<Compression>().is_err());
    }
}
