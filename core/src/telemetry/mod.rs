//! telemetry/mod.rs
//! Counters, stage timers and immutable snapshots for the replay transforms.
//!
//! Notes:
//! - Counters are plain values owned by one call; merge them to aggregate.
//! - Snapshots are serializable so callers can ship them to their own metrics.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
