//! Capture event model and snapshot classification.
//!
//! Responsibilities:
//! - Typed view over raw capture events (lossless for unknown fields)
//! - Snapshot type tags
//! - Partitioning a stream into snapshot groups and pass-through events
//!
//! Non-responsibilities:
//! - Encoding or batching (see `chunking`, `batching`)

pub mod types;
pub mod classify;

pub use types::{CaptureEvent, EventShapeError, SnapshotType, WindowKey};
pub use classify::{
    classify,
    classify_captured,
    is_unprocessed_snapshot,
    split_replay_events,
    ClassifiedEvents,
    ClassifyError,
};
