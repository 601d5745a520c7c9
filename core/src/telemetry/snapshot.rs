//! telemetry/snapshot.rs
//! Immutable end-of-call report.
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::{BatchCounters, DecodeCounters};
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub events_in: u64,
    pub events_out: u64,
    pub passthrough_events: u64,
    pub batch: BatchCounters,
    pub decode: DecodeCounters,
    /// Compressed over uncompressed text bytes, 0 when nothing was decoded.
    pub compression_ratio: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn new(timer: &TelemetryTimer) -> Self {
        Self { elapsed: timer.elapsed(), stage_times: timer.stage_times.clone(), ..Self::default() }
    }

    pub fn with_batch(mut self, batch: BatchCounters) -> Self {
        self.batch = batch;
        self
    }

    pub fn with_decode(mut self, decode: DecodeCounters) -> Self {
        self.compression_ratio = if decode.bytes_decompressed > 0 {
            decode.bytes_compressed as f64 / decode.bytes_decompressed as f64
        } else {
            0.0
        };
        self.decode = decode;
        self
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    /// Stage times never exceed the wall clock.
    pub fn sanity_check(&self) -> bool {
        self.total_stage_time() <= self.elapsed
    }
}
