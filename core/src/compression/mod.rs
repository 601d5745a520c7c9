//! compression/mod.rs
//! Text codec primitives for chunk payloads.
//!
//! Responsibilities:
//! - UTF-16 framing that tolerates unpaired surrogates
//! - gzip + base64 transport encoding
//! - Resolving a wire compression tag to a codec
//!
//! Non-responsibilities:
//! - Chunk slicing (see `chunking`)
//! - Byte-budget accounting (see `utils::byte_size`)

pub mod constants;
pub mod types;
pub mod text;
pub mod registry;
pub mod codecs;

pub use constants::*;
pub use types::*;
pub use registry::*;

use crate::compression::codecs::GzipBase64Codec;

/// Compress `text` into the `gzip-base64` transport form.
pub fn compress(text: &str) -> Result<String, CompressionError> {
    let units: Vec<u16> = text.encode_utf16().collect();
    compress_units(&units)
}

/// Compress raw UTF-16 code units, lone surrogates included.
pub fn compress_units(units: &[u16]) -> Result<String, CompressionError> {
    GzipBase64Codec::default().encode(units)
}

/// Inverse of [`compress_units`].
pub fn decompress_units(data: &str) -> Result<Vec<u16>, CompressionError> {
    GzipBase64Codec::default().decode(data)
}

/// Inverse of [`compress`]. Fails on lone surrogates, which a `String` cannot hold.
pub fn decompress(data: &str) -> Result<String, CompressionError> {
    let units = decompress_units(data)?;
    text::units_to_string(&units)
}
