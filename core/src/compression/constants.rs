/// Wire tags carried in `ChunkRecord::compression`.
pub mod compression_tags {
    pub const GZIP_BASE64: &str = "gzip-base64";
}

/// gzip level used by the encoder (matches `gzip.compress` defaults).
pub const DEFAULT_LEVEL_GZIP: u32 = 9;

/// UTF-16 byte-order marks.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
pub const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];
