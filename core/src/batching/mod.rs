//! Adaptive byte-budget batching of snapshot payloads.
//!
//! Responsibilities:
//! - Choose one packing policy per `(session, window)` group
//! - Pack payloads into `$snapshot_items` batches under the byte budget
//! - Bounded bisection of groups that still do not fit
//!
//! Non-responsibilities:
//! - Classification (see `event`)
//! - Transport of the batches

pub mod types;
pub mod policy;
pub mod split;
pub mod batcher;

pub use types::{BatchError, BatchPolicy, SnapshotItemsBatch};
pub use policy::{GroupPlan, MeasuredItems};
pub use split::{split_to_budget, SplitOutcome};
pub use batcher::SnapshotBatcher;
