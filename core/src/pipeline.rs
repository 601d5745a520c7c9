//! pipeline.rs
//! End-to-end entry points: classify, then encode with the chosen codec.
//!
//! Output order: pass-through events first (input order), then the encoded
//! snapshot events group by group.
use serde_json::Value;

use crate::batching::SnapshotBatcher;
use crate::chunking::{compress_and_chunk, decompress_chunked, DecodeOptions, DecodedRecording, IngestedSnapshot};
use crate::config::ReplayConfig;
use crate::event::{classify, CaptureEvent};
use crate::telemetry::{Stage, TelemetrySnapshot, TelemetryTimer};
use crate::types::ReplayError;

#[derive(Debug, Clone)]
pub struct ProcessedEvents {
    pub events: Vec<CaptureEvent>,
    pub telemetry: TelemetrySnapshot,
}

impl ProcessedEvents {
    pub fn into_values(self) -> Vec<Value> {
        self.events.into_iter().map(Value::from).collect()
    }
}

/// Adaptive path: snapshots become `$snapshot_items` batches under the byte budget.
pub fn preprocess_replay_events<I>(events: I, config: &ReplayConfig) -> Result<ProcessedEvents, ReplayError>
where
    I: IntoIterator<Item = Value>,
{
    let batcher = SnapshotBatcher::new(config.clone())?;
    let mut timer = TelemetryTimer::new();

    let events: Vec<Value> = events.into_iter().collect();
    let events_in = events.len() as u64;

    let classified = timer.time(Stage::Classify, || classify(events))?;
    let passthrough = classified.others.len() as u64;

    let (batches, counters) = timer.time(Stage::Batch, || batcher.batch(classified.snapshots))?;

    let mut out = classified.others;
    out.extend(batches.into_iter().map(|b| b.into_event()));

    timer.finish();
    let mut telemetry = TelemetrySnapshot::new(&timer).with_batch(counters);
    telemetry.events_in = events_in;
    telemetry.events_out = out.len() as u64;
    telemetry.passthrough_events = passthrough;

    Ok(ProcessedEvents { events: out, telemetry })
}

/// Legacy path: each group is compressed once and sliced into chunk records.
pub fn legacy_preprocess_replay_events<I>(events: I, config: &ReplayConfig) -> Result<ProcessedEvents, ReplayError>
where
    I: IntoIterator<Item = Value>,
{
    config.validate()?;
    let mut timer = TelemetryTimer::new();

    let events: Vec<Value> = events.into_iter().collect();
    let events_in = events.len() as u64;

    let classified = timer.time(Stage::Classify, || classify(events))?;
    let passthrough = classified.others.len() as u64;

    let mut out = classified.others;
    for (_, group) in classified.snapshots {
        let chunks = timer.time(Stage::Chunk, || compress_and_chunk(&group, config.chunk_size))?;
        out.extend(chunks);
    }

    timer.finish();
    let mut telemetry = TelemetrySnapshot::new(&timer);
    telemetry.events_in = events_in;
    telemetry.events_out = out.len() as u64;
    telemetry.passthrough_events = passthrough;

    Ok(ProcessedEvents { events: out, telemetry })
}

/// Read path: reassemble stored rows and report what was dropped.
pub fn reconstruct_recording<I>(
    records: I,
    options: &DecodeOptions,
) -> Result<(DecodedRecording, TelemetrySnapshot), ReplayError>
where
    I: IntoIterator<Item = IngestedSnapshot>,
{
    let mut timer = TelemetryTimer::new();
    let decoded = timer.time(Stage::Decode, || decompress_chunked(records, options))?;
    timer.finish();

    let mut telemetry = TelemetrySnapshot::new(&timer).with_decode(decoded.counters.clone());
    telemetry.events_in = decoded.counters.records;
    telemetry.events_out = decoded.snapshots.len() as u64;
    telemetry.passthrough_events = decoded.counters.plain_records;

    Ok((decoded, telemetry))
}
