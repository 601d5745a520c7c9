// Legacy chunk codec: encoder slicing and two-phase decoder.

#[cfg(test)]
mod tests {
    use replay_core::chunking::{
        compress_and_chunk, compress_and_chunk_with_id, decompress_chunked, ChunkError, ChunkRecord,
        DecodeOptions, DropReason, IngestedSnapshot,
    };
    use replay_core::compression::CompressionError;
    use proptest::prelude::*;
    use replay_core::event::CaptureEvent;
    use serde_json::{json, Value};

    fn event(window: &str, data: Value) -> CaptureEvent {
        CaptureEvent::try_from(json!({
            "event": "$snapshot",
            "uuid": "u-1",
            "properties": {
                "distinct_id": "d1",
                "$session_id": "s1",
                "$window_id": window,
                "$snapshot_data": data,
            }
        }))
        .unwrap()
    }

    fn session_events() -> Vec<CaptureEvent> {
        vec![
            event("w1", json!({"type": 4, "data": {"href": "https://example.com"}})),
            event("w1", json!({"type": 2, "data": {"node": {"id": 1, "childNodes": []}}})),
            event("w1", json!([{"type": 3, "data": {"source": 1}}, {"type": 3, "data": {"source": 2}}])),
        ]
    }

    fn expected_payloads() -> Vec<Value> {
        vec![
            json!({"type": 4, "data": {"href": "https://example.com"}}),
            json!({"type": 2, "data": {"node": {"id": 1, "childNodes": []}}}),
            json!({"type": 3, "data": {"source": 1}}),
            json!({"type": 3, "data": {"source": 2}}),
        ]
    }

    fn records(chunks: &[CaptureEvent]) -> Vec<IngestedSnapshot> {
        chunks.iter().map(|c| IngestedSnapshot::from_event(c).unwrap()).collect()
    }

    fn chunk_record(ev: &CaptureEvent) -> ChunkRecord {
        ChunkRecord::from_value(ev.prop("$snapshot_data").unwrap()).unwrap()
    }

// # ✅ 1. Encoder shape

    #[test]
    fn encoder_slices_share_id_and_count() {
        let chunks = compress_and_chunk(&session_events(), 16).unwrap();
        assert!(chunks.len() > 1);

        let first = chunk_record(&chunks[0]);
        assert!(uuid::Uuid::parse_str(&first.chunk_id).is_ok());

        for (i, ev) in chunks.iter().enumerate() {
            let rec = chunk_record(ev);
            assert_eq!(rec.chunk_id, first.chunk_id);
            assert_eq!(rec.chunk_index, i);
            assert_eq!(rec.chunk_count, chunks.len());
            assert_eq!(rec.compression, "gzip-base64");
            assert!(rec.has_full_snapshot);
            assert!(rec.data.len() <= 16);
            assert_eq!(ev.event, "$snapshot");
            assert_eq!(ev.session_id(), Some("s1"));
            assert_eq!(ev.window_id(), Some("w1"));
            assert_eq!(ev.prop("distinct_id"), Some(&json!("d1")));
            assert_eq!(ev.extra.get("uuid"), Some(&json!("u-1")));
        }
    }

    #[test]
    fn encoder_fresh_id_per_call() {
        let a = compress_and_chunk(&session_events(), 1024).unwrap();
        let b = compress_and_chunk(&session_events(), 1024).unwrap();
        assert_ne!(chunk_record(&a[0]).chunk_id, chunk_record(&b[0]).chunk_id);
    }

    #[test]
    fn encoder_flags_missing_full_snapshot() {
        let events = vec![event("w1", json!({"type": 3})), event("w1", json!({"type": 4}))];
        let chunks = compress_and_chunk(&events, 1024).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(!chunk_record(&chunks[0]).has_full_snapshot);
    }

    #[test]
    fn encoder_empty_input_is_empty() {
        assert!(compress_and_chunk(&[], 1024).unwrap().is_empty());
    }

    #[test]
    fn encoder_rejects_zero_chunk_size() {
        assert!(matches!(
            compress_and_chunk(&session_events(), 0),
            Err(ChunkError::InvalidChunkSize)
        ));
    }

// # ✅ 2. Chunk completeness

    #[test]
    fn complete_group_reconstructs_payloads() {
        let chunks = compress_and_chunk_with_id(&session_events(), 16, "c1").unwrap();
        let decoded = decompress_chunked(records(&chunks), &DecodeOptions::default()).unwrap();

        assert!(decoded.dropped.is_empty());
        assert_eq!(decoded.payloads().cloned().collect::<Vec<_>>(), expected_payloads());
        assert!(decoded.snapshots.iter().all(|s| s.window_id.as_deref() == Some("w1")));
        assert_eq!(decoded.counters.groups_decoded, 1);
        assert_eq!(decoded.counters.chunks_seen, chunks.len() as u64);
    }

    #[test]
    fn out_of_order_slices_are_sorted() {
        let chunks = compress_and_chunk_with_id(&session_events(), 16, "c1").unwrap();
        let mut rows = records(&chunks);
        rows.reverse();
        let decoded = decompress_chunked(rows, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.payloads().cloned().collect::<Vec<_>>(), expected_payloads());
    }

    #[test]
    fn removing_any_slice_drops_whole_group() {
        let chunks = compress_and_chunk_with_id(&session_events(), 16, "c1").unwrap();
        let n = chunks.len();

        for missing in 0..n {
            let mut rows = records(&chunks);
            rows.remove(missing);
            let decoded = decompress_chunked(rows, &DecodeOptions::default()).unwrap();

            assert!(decoded.snapshots.is_empty());
            assert_eq!(decoded.dropped.len(), 1);
            assert_eq!(decoded.dropped[0].chunk_id, "c1");
            assert_eq!(
                decoded.dropped[0].reason,
                DropReason::Incomplete { expected: n, observed: n - 1 }
            );
            assert_eq!(decoded.counters.groups_dropped, 1);
        }
    }

    #[test]
    fn scenario_c_declared_two_seen_one() {
        let row = IngestedSnapshot::new(
            Some("w1".into()),
            json!({
                "chunk_id": "abc",
                "chunk_index": 0,
                "chunk_count": 2,
                "data": "H4sI",
                "compression": "gzip-base64",
                "has_full_snapshot": false
            }),
        );
        let options = DecodeOptions::default().with_session_id("s1");
        let decoded = decompress_chunked(vec![row], &options).unwrap();

        assert_eq!(decoded.payloads().count(), 0);
        assert_eq!(decoded.dropped.len(), 1);
        assert_eq!(decoded.dropped[0].reason, DropReason::Incomplete { expected: 2, observed: 1 });
    }

    #[test]
    fn duplicate_slices_keep_first_seen() {
        let chunks = compress_and_chunk_with_id(&session_events(), 16, "c1").unwrap();
        let mut rows = records(&chunks);
        rows.push(rows[0].clone());
        let decoded = decompress_chunked(rows, &DecodeOptions::default()).unwrap();

        assert_eq!(decoded.counters.duplicate_chunks, 1);
        assert_eq!(decoded.payloads().cloned().collect::<Vec<_>>(), expected_payloads());
    }

    #[test]
    fn inconsistent_chunk_count_is_dropped() {
        let chunks = compress_and_chunk_with_id(&session_events(), 16, "c1").unwrap();
        let mut rows = records(&chunks);
        rows[0].snapshot_data["chunk_count"] = json!(99);
        let decoded = decompress_chunked(rows, &DecodeOptions::default()).unwrap();

        assert!(decoded.snapshots.is_empty());
        assert!(matches!(decoded.dropped[0].reason, DropReason::InconsistentChunkCount { .. }));
    }

// # ✅ 3. Pass-through and ordering

    #[test]
    fn plain_rows_interleave_by_first_position() {
        let chunks = compress_and_chunk_with_id(&session_events(), 16, "c1").unwrap();
        let mut rows = vec![IngestedSnapshot::new(Some("w0".into()), json!({"type": 4, "plain": "a"}))];
        rows.extend(records(&chunks));
        rows.push(IngestedSnapshot::new(Some("w0".into()), json!({"type": 3, "plain": "b"})));

        let decoded = decompress_chunked(rows, &DecodeOptions::default()).unwrap();
        let payloads: Vec<Value> = decoded.payloads().cloned().collect();

        assert_eq!(payloads.len(), 6);
        assert_eq!(payloads[0]["plain"], json!("a"));
        assert_eq!(payloads[1..5].to_vec(), expected_payloads());
        assert_eq!(payloads[5]["plain"], json!("b"));

        let by_window = decoded.by_window();
        assert_eq!(by_window[&Some("w0".to_string())].len(), 2);
        assert_eq!(by_window[&Some("w1".to_string())].len(), 4);
    }

    #[test]
    fn limit_counts_decoded_units() {
        let chunks = compress_and_chunk_with_id(&session_events(), 16, "c1").unwrap();
        let mut rows = vec![IngestedSnapshot::new(None, json!({"type": 4}))];
        rows.extend(records(&chunks));

        let one = decompress_chunked(rows.clone(), &DecodeOptions::default().with_limit(1)).unwrap();
        assert_eq!(one.payloads().count(), 1);

        let two = decompress_chunked(rows, &DecodeOptions::default().with_limit(2)).unwrap();
        assert_eq!(two.payloads().count(), 5);
    }

// # ❌ 4. Hard errors

    #[test]
    fn unknown_compression_tag_is_fatal() {
        let chunks = compress_and_chunk_with_id(&session_events(), 16, "c1").unwrap();
        let mut rows = records(&chunks);
        for row in rows.iter_mut() {
            row.snapshot_data["compression"] = json!("brotli");
        }
        match decompress_chunked(rows, &DecodeOptions::default()) {
            Err(ChunkError::Compression(CompressionError::UnknownCompression { tag })) => {
                assert_eq!(tag, "brotli")
            }
            other => panic!("unexpected result: {:?}", other.map(|d| d.snapshots.len())),
        }
    }

    #[test]
    fn unknown_tag_on_partial_group_is_fatal() {
        let row = IngestedSnapshot::new(
            None,
            json!({
                "chunk_id": "abc",
                "chunk_index": 0,
                "chunk_count": 2,
                "data": "H4sI",
                "compression": "brotli",
                "has_full_snapshot": false
            }),
        );
        assert!(matches!(
            decompress_chunked(vec![row], &DecodeOptions::default()),
            Err(ChunkError::Compression(CompressionError::UnknownCompression { .. }))
        ));
    }

    #[test]
    fn malformed_chunk_record_is_fatal() {
        let row = IngestedSnapshot::new(None, json!({"chunk_id": "c", "chunk_index": "zero"}));
        assert!(matches!(
            decompress_chunked(vec![row], &DecodeOptions::default()),
            Err(ChunkError::MalformedRecord { position: 0, .. })
        ));
    }

// # ✅ 5. Round-trip properties

    fn payload_strategy() -> impl Strategy<Value = Value> {
        (0u8..7, ".{0,24}", any::<i64>())
            .prop_map(|(t, text, n)| json!({"type": t, "data": {"text": text, "n": n}}))
    }

    proptest! {
        #[test]
        fn any_session_survives_chunking(
            payloads in prop::collection::vec(payload_strategy(), 1..12),
            chunk_size in 1usize..64,
        ) {
            let events: Vec<CaptureEvent> = payloads.iter().map(|p| event("w1", p.clone())).collect();
            let chunks = compress_and_chunk_with_id(&events, chunk_size, "c1").unwrap();
            let decoded = decompress_chunked(records(&chunks), &DecodeOptions::default()).unwrap();

            prop_assert!(decoded.dropped.is_empty());
            prop_assert_eq!(decoded.payloads().cloned().collect::<Vec<_>>(), payloads);
        }
    }
}
