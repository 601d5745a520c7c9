//! telemetry/counters.rs
//! Mutable counters collected while batching or decoding.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::batching::BatchPolicy;

/// Adaptive batcher counters.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCounters {
    pub groups: u64,
    pub events_in: u64,
    pub items_in: u64,
    pub batches_hinted: u64,
    pub batches_single: u64,
    pub batches_full_snapshot: u64,
    pub batches_split: u64,
    pub split_rounds: u64,
    /// Batches emitted over budget (singleton or when the round cap hit).
    pub oversized_batches: u64,
}

impl BatchCounters {
    /// Record one emitted batch under the policy that produced it.
    pub fn add_batch(&mut self, policy: BatchPolicy) {
        match policy {
            BatchPolicy::SizeHinted            => self.batches_hinted += 1,
            BatchPolicy::SingleBatch           => self.batches_single += 1,
            BatchPolicy::FullSnapshotIsolation => self.batches_full_snapshot += 1,
            BatchPolicy::RecursiveSplit        => self.batches_split += 1,
        }
    }

    pub fn batches_total(&self) -> u64 {
        self.batches_hinted + self.batches_single + self.batches_full_snapshot + self.batches_split
    }

    pub fn merge(&mut self, other: &BatchCounters) {
        self.groups += other.groups;
        self.events_in += other.events_in;
        self.items_in += other.items_in;
        self.batches_hinted += other.batches_hinted;
        self.batches_single += other.batches_single;
        self.batches_full_snapshot += other.batches_full_snapshot;
        self.batches_split += other.batches_split;
        self.split_rounds += other.split_rounds;
        self.oversized_batches += other.oversized_batches;
    }
}

impl AddAssign for BatchCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}

/// Legacy chunk decoder counters.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeCounters {
    pub records: u64,
    pub plain_records: u64,
    pub chunks_seen: u64,
    pub duplicate_chunks: u64,
    pub groups_decoded: u64,
    pub groups_dropped: u64,
    pub bytes_compressed: u64,
    pub bytes_decompressed: u64,
}

impl DecodeCounters {
    pub fn merge(&mut self, other: &DecodeCounters) {
        self.records += other.records;
        self.plain_records += other.plain_records;
        self.chunks_seen += other.chunks_seen;
        self.duplicate_chunks += other.duplicate_chunks;
        self.groups_decoded += other.groups_decoded;
        self.groups_dropped += other.groups_dropped;
        self.bytes_compressed += other.bytes_compressed;
        self.bytes_decompressed += other.bytes_decompressed;
    }
}

impl AddAssign for DecodeCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
