//! gzip over surrogate-tolerant UTF-16, base64 wrapped for text transports.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

use crate::compression::constants::DEFAULT_LEVEL_GZIP;
use crate::compression::text::{decode_utf16_surrogatepass, encode_utf16_surrogatepass};
use crate::compression::types::{CompressionError, CompressionTag, TextCodec};

pub struct GzipBase64Codec {
    level: Compression,
}

impl GzipBase64Codec {
    pub fn new(level: u32) -> Self {
        let level = match level {
            0..=9 => Compression::new(level),
            _ => Compression::default(),
        };
        Self { level }
    }
}

impl Default for GzipBase64Codec {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL_GZIP)
    }
}

impl TextCodec for GzipBase64Codec {
    fn tag(&self) -> CompressionTag {
        CompressionTag::GzipBase64
    }

    fn encode(&self, units: &[u16]) -> Result<String, CompressionError> {
        let raw = encode_utf16_surrogatepass(units);

        let mut enc = GzEncoder::new(Vec::with_capacity(raw.len() / 4), self.level);
        enc.write_all(&raw)?;
        let compressed = enc.finish()?;

        Ok(STANDARD.encode(compressed))
    }

    fn decode(&self, data: &str) -> Result<Vec<u16>, CompressionError> {
        let compressed = STANDARD.decode(data.as_bytes())?;

        let mut dec = GzDecoder::new(compressed.as_slice());
        let mut raw = Vec::new();
        dec.read_to_end(&mut raw)?;

        decode_utf16_surrogatepass(&raw)
    }
}
