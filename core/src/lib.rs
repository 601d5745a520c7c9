//! replay-core
//!
//! Session-replay snapshot codec. Classifies capture events, encodes snapshot
//! payloads either as legacy gzip-base64 chunk records or as adaptive
//! `$snapshot_items` batches under a byte budget, and reassembles chunk
//! records at read time.
//! No I/O, no global state.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod config;
pub mod types;
pub mod utils;

pub mod compression;
pub mod event;
pub mod telemetry;

// Codecs
pub mod chunking;
pub mod batching;

pub mod pipeline;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::batching::{BatchPolicy, SnapshotBatcher, SnapshotItemsBatch};
    pub use crate::chunking::{
        compress_and_chunk, decompress_chunked, ChunkRecord, DecodeOptions, DecodedRecording,
        IngestedSnapshot,
    };
    pub use crate::compression::{compress, decompress};
    pub use crate::config::ReplayConfig;
    pub use crate::event::{classify, CaptureEvent, SnapshotType, WindowKey};
    pub use crate::pipeline::{
        legacy_preprocess_replay_events, preprocess_replay_events, reconstruct_recording,
        ProcessedEvents,
    };
    pub use crate::types::ReplayError;
    pub use crate::utils::byte_size;
}
