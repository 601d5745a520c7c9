//! Legacy whole-session chunk codec.
//!
//! Responsibilities:
//! - Compress a session's buffered payloads once and slice the result
//! - Regroup slices by chunk id, validate completeness and decode
//!
//! Non-responsibilities:
//! - The text transform itself (see `compression`)
//! - Persistence of chunk records

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    ChunkError,
    ChunkRecord,
    DecodeOptions,
    DecodedRecording,
    DropReason,
    DroppedChunkGroup,
    IngestedSnapshot,
    WindowedSnapshot,
};
pub use encode::{
    compress_and_chunk,
    compress_and_chunk_with_id,
};
pub use decode::decompress_chunked;
