//! batching/policy.rs
//! Per-group policy selection.
//!
//! The plan is built once per group and carries whatever the selection already
//! computed (hints or measured sizes) so nothing is serialized twice.
use serde_json::Value;

use crate::batching::types::{BatchError, BatchPolicy};
use crate::event::{CaptureEvent, SnapshotType};
use crate::utils::{array_byte_size, byte_size};

/// Payloads with their individual serialized sizes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasuredItems {
    pub items: Vec<Value>,
    pub sizes: Vec<usize>,
}

impl MeasuredItems {
    pub fn measure(items: Vec<Value>) -> Result<Self, BatchError> {
        let sizes = items.iter().map(byte_size).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { items, sizes })
    }

    pub fn push(&mut self, item: Value, size: usize) {
        self.items.push(item);
        self.sizes.push(size);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialized size of the items as one JSON array.
    pub fn total_size(&self) -> usize {
        array_byte_size(&self.sizes)
    }

    pub fn has_full_snapshot(&self) -> bool {
        self.items.iter().any(SnapshotType::is_full_snapshot)
    }
}

/// A group with its selected policy and the data that policy needs.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupPlan {
    /// Per event: flattened payloads and the reported size.
    SizeHinted(Vec<(Vec<Value>, usize)>),
    SingleBatch(Vec<Value>),
    FullSnapshotIsolation(MeasuredItems),
    RecursiveSplit(MeasuredItems),
}

impl GroupPlan {
    pub fn build(events: Vec<CaptureEvent>, budget: usize) -> Result<Self, BatchError> {
        let hinted = !events.is_empty() && events.iter().all(|e| e.snapshot_bytes_hint().is_some());

        if hinted {
            let sized = events
                .into_iter()
                .map(|e| {
                    let hint = e.snapshot_bytes_hint().unwrap_or(0);
                    (e.into_snapshot_payloads(), hint)
                })
                .collect();
            return Ok(GroupPlan::SizeHinted(sized));
        }

        let items: Vec<Value> = events.into_iter().flat_map(CaptureEvent::into_snapshot_payloads).collect();
        let measured = MeasuredItems::measure(items)?;

        if measured.total_size() < budget {
            return Ok(GroupPlan::SingleBatch(measured.items));
        }
        if measured.has_full_snapshot() {
            return Ok(GroupPlan::FullSnapshotIsolation(measured));
        }
        Ok(GroupPlan::RecursiveSplit(measured))
    }

    pub fn policy(&self) -> BatchPolicy {
        match self {
            GroupPlan::SizeHinted(_)            => BatchPolicy::SizeHinted,
            GroupPlan::SingleBatch(_)           => BatchPolicy::SingleBatch,
            GroupPlan::FullSnapshotIsolation(_) => BatchPolicy::FullSnapshotIsolation,
            GroupPlan::RecursiveSplit(_)        => BatchPolicy::RecursiveSplit,
        }
    }
}

impl BatchPolicy {
    /// Policy a group of events would be packed with under `budget`.
    pub fn select(events: &[CaptureEvent], budget: usize) -> Result<Self, BatchError> {
        Ok(GroupPlan::build(events.to_vec(), budget)?.policy())
    }
}
