//! chunking/types.rs
//! Chunk records, decoder inputs and outputs.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::compression::CompressionError;
use crate::constants::{chunk_keys, props};
use crate::event::CaptureEvent;
use crate::telemetry::DecodeCounters;

/// One slice of a compressed session payload.
///
/// All records sharing a `chunk_id` declare the same `chunk_count`; the
/// payload is recoverable once indices `0..chunk_count` have all been seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub chunk_id: String,
    pub chunk_index: usize,
    pub chunk_count: usize,
    pub data: String,
    pub compression: String,
    pub has_full_snapshot: bool,
}

impl ChunkRecord {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        ChunkRecord::deserialize(value)
    }
}

/// A stored snapshot row as read back for playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestedSnapshot {
    pub window_id: Option<String>,
    pub snapshot_data: Value,
}

impl IngestedSnapshot {
    pub fn new(window_id: Option<String>, snapshot_data: Value) -> Self {
        Self { window_id, snapshot_data }
    }

    /// Row view of an encoded event. `None` if it has no `$snapshot_data`.
    pub fn from_event(event: &CaptureEvent) -> Option<Self> {
        let data = event.prop(props::SNAPSHOT_DATA)?.clone();
        Some(Self::new(event.window_id().map(str::to_string), data))
    }

    pub fn chunk_id(&self) -> Option<&str> {
        self.snapshot_data.get(chunk_keys::CHUNK_ID).and_then(Value::as_str)
    }
}

/// A decoded payload tagged with the window it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowedSnapshot {
    pub window_id: Option<String>,
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DropReason {
    /// Distinct in-range indices observed differ from the declared count.
    Incomplete { expected: usize, observed: usize },
    /// Members of the group disagree on `chunk_count`.
    InconsistentChunkCount { counts: Vec<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedChunkGroup {
    pub chunk_id: String,
    pub window_id: Option<String>,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Stop after this many decoded units (plain record or complete group).
    pub limit: Option<usize>,
    /// Reporting context only.
    pub session_id: Option<String>,
}

impl DecodeOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecodedRecording {
    /// Payloads in reconstruction order.
    pub snapshots: Vec<WindowedSnapshot>,
    /// Groups that could not be reassembled.
    pub dropped: Vec<DroppedChunkGroup>,
    pub counters: DecodeCounters,
}

impl DecodedRecording {
    pub fn payloads(&self) -> impl Iterator<Item = &Value> {
        self.snapshots.iter().map(|s| &s.data)
    }

    /// Regroup by window id, windows in first-seen order.
    pub fn by_window(self) -> IndexMap<Option<String>, Vec<Value>> {
        let mut out: IndexMap<Option<String>, Vec<Value>> = IndexMap::new();
        for snap in self.snapshots {
            out.entry(snap.window_id).or_default().push(snap.data);
        }
        out
    }
}

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("chunk size must be > 0")]
    InvalidChunkSize,

    #[error("first event of the session has no `$session_id`")]
    MissingSessionId,

    #[error("malformed chunk record at position {position}: {source}")]
    MalformedRecord {
        position: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("chunk group {chunk_id} mixes compression tags")]
    MixedCompression { chunk_id: String },

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("payload json error: {0}")]
    Json(#[from] serde_json::Error),
}
