//! compression/types.rs
//! Compression tags, errors and the codec trait.
use std::fmt;
use std::io;

use thiserror::Error;

use crate::compression::constants::compression_tags;

/// Known wire compression tags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CompressionTag {
    GzipBase64,
}

impl CompressionTag {
    /// Unknown tags are a hard error; nothing downstream can guess the inverse.
    pub fn parse(raw: &str) -> Result<Self, CompressionError> {
        match raw {
            compression_tags::GZIP_BASE64 => Ok(CompressionTag::GzipBase64),
            other => Err(CompressionError::UnknownCompression { tag: other.to_string() }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionTag::GzipBase64 => compression_tags::GZIP_BASE64,
        }
    }
}

impl fmt::Display for CompressionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("unknown compression tag: {tag:?}")]
    UnknownCompression { tag: String },

    #[error("base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("gzip stream failed: {0}")]
    Gzip(#[from] io::Error),

    #[error("utf-16 payload has odd byte length {len}")]
    OddUtf16Length { len: usize },

    #[error("lone surrogate 0x{unit:04x} cannot be represented as a string")]
    LoneSurrogate { unit: u16 },
}

/// A reversible text transport encoding over UTF-16 code units.
pub trait TextCodec: Send {
    fn tag(&self) -> CompressionTag;
    /// Encode code units into a transport-safe string.
    fn encode(&self, units: &[u16]) -> Result<String, CompressionError>;
    /// Decode a transport string back into code units.
    fn decode(&self, data: &str) -> Result<Vec<u16>, CompressionError>;
}
