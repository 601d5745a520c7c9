//! batching/types.rs
//! Output batch and policy tags.
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::{props, SNAPSHOT_ITEMS_EVENT};
use crate::event::CaptureEvent;
use crate::utils::byte_size;

/// Packing policies, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BatchPolicy {
    /// Every event reports `$snapshot_bytes`; sizes are summed, never measured.
    SizeHinted,
    /// All payloads fit in one batch.
    SingleBatch,
    /// Full snapshots go out alone; the rest is packed around them.
    FullSnapshotIsolation,
    /// No full snapshots to peel off; bisect until parts fit.
    RecursiveSplit,
}

/// One `$snapshot_items` event worth of payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotItemsBatch {
    pub distinct_id: Value,
    pub session_id: String,
    pub window_id: String,
    pub snapshot_items: Vec<Value>,
    pub snapshot_source: String,
    pub lib: String,
    /// Policy that produced this batch.
    #[serde(skip)]
    pub policy: BatchPolicy,
    /// Top-level fields of the group's first event.
    #[serde(skip)]
    pub extra: Map<String, Value>,
}

impl SnapshotItemsBatch {
    pub fn byte_size(&self) -> Result<usize, serde_json::Error> {
        byte_size(&self.snapshot_items)
    }

    pub fn len(&self) -> usize {
        self.snapshot_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot_items.is_empty()
    }

    pub fn into_event(self) -> CaptureEvent {
        let mut properties = Map::with_capacity(6);
        properties.insert(props::DISTINCT_ID.into(), self.distinct_id);
        properties.insert(props::SESSION_ID.into(), Value::String(self.session_id));
        properties.insert(props::WINDOW_ID.into(), Value::String(self.window_id));
        properties.insert(props::SNAPSHOT_ITEMS.into(), Value::Array(self.snapshot_items));
        properties.insert(props::SNAPSHOT_SOURCE.into(), Value::String(self.snapshot_source));
        properties.insert(props::LIB.into(), Value::String(self.lib));

        CaptureEvent { event: SNAPSHOT_ITEMS_EVENT.to_string(), properties, extra: self.extra }
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to measure payload size: {0}")]
    Measure(#[from] serde_json::Error),
}
