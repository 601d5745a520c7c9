//! Criterion micro-benchmarks for the adaptive batcher and the legacy codec.

use criterion::{criterion_group, criterion_main, Criterion};
use indexmap::IndexMap;
use replay_core::batching::SnapshotBatcher;
use replay_core::chunking::{compress_and_chunk, decompress_chunked, DecodeOptions, IngestedSnapshot};
use replay_core::config::ReplayConfig;
use replay_core::event::{CaptureEvent, WindowKey};
use serde_json::json;

/// One full snapshot followed by `n` incremental mutations.
fn session(n: usize, pad: usize) -> Vec<CaptureEvent> {
    let mut payloads = vec![json!({"type": 2, "data": {"node": "n".repeat(pad * 8)}})];
    payloads.extend((0..n).map(|i| json!({"type": 3, "data": {"i": i, "pad": "x".repeat(pad)}})));
    payloads
        .into_iter()
        .map(|p| {
            CaptureEvent::try_from(json!({
                "event": "$snapshot",
                "properties": {"$session_id": "s", "$window_id": "w", "$snapshot_data": p}
            }))
            .unwrap()
        })
        .collect()
}

fn groups(events: Vec<CaptureEvent>) -> IndexMap<WindowKey, Vec<CaptureEvent>> {
    let mut g = IndexMap::new();
    g.insert(WindowKey::new("s", Some("w".into())), events);
    g
}

/// Benchmark: 2K events packed under a 64 KiB ceiling (isolation + split).
fn bench_batch_measured(c: &mut Criterion) {
    let batcher = SnapshotBatcher::new(ReplayConfig::default().with_max_size_bytes(64 * 1024)).unwrap();
    let events = session(2_000, 200);

    c.bench_function("batch_measured_2k", |b| {
        b.iter(|| {
            let out = batcher.batch(groups(events.clone())).unwrap();
            std::hint::black_box(&out);
        });
    });
}

/// Benchmark: gzip + slice, then reassemble.
fn bench_legacy_round_trip(c: &mut Criterion) {
    let events = session(500, 100);

    c.bench_function("legacy_round_trip_500", |b| {
        b.iter(|| {
            let chunks = compress_and_chunk(&events, 16 * 1024).unwrap();
            let rows: Vec<IngestedSnapshot> = chunks.iter().filter_map(IngestedSnapshot::from_event).collect();
            let decoded = decompress_chunked(rows, &DecodeOptions::default()).unwrap();
            std::hint::black_box(&decoded);
        });
    });
}

criterion_group!(benches, bench_batch_measured, bench_legacy_round_trip);
criterion_main!(benches);
