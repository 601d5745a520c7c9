//! compression/registry.rs
//! Tag registry and codec factory.

use crate::compression::codecs::GzipBase64Codec;
use crate::compression::types::{CompressionError, CompressionTag, TextCodec};

pub struct CodecInfo {
    pub name: &'static str,
    pub tag: CompressionTag,
}

pub fn resolve(tag: &str) -> Result<CodecInfo, CompressionError> {
    let tag = CompressionTag::parse(tag)?;
    Ok(CodecInfo { name: tag.as_str(), tag })
}

pub fn create_codec(tag: CompressionTag) -> Box<dyn TextCodec> {
    match tag {
        CompressionTag::GzipBase64 => Box::new(GzipBase64Codec::default()),
    }
}

/// Resolve a raw wire tag straight to its codec.
pub fn codec_for_tag(tag: &str) -> Result<Box<dyn TextCodec>, CompressionError> {
    Ok(create_codec(resolve(tag)?.tag))
}
