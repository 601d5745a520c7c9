use serde_json::Value;
use uuid::Uuid;

use crate::chunking::types::{ChunkError, ChunkRecord};
use crate::compression::{compress, compression_tags};
use crate::constants::props;
use crate::event::{CaptureEvent, SnapshotType};

/// Compress every payload buffered for one session and slice the result.
///
/// Each output event is a copy of the first input event whose
/// `$snapshot_data` is replaced by one [`ChunkRecord`]. A fresh UUID v4 is
/// shared by all slices of the call.
pub fn compress_and_chunk(
    events: &[CaptureEvent],
    chunk_size: usize,
) -> Result<Vec<CaptureEvent>, ChunkError> {
    let chunk_id = Uuid::new_v4().to_string();
    compress_and_chunk_with_id(events, chunk_size, &chunk_id)
}

/// [`compress_and_chunk`] with a caller-chosen chunk id.
pub fn compress_and_chunk_with_id(
    events: &[CaptureEvent],
    chunk_size: usize,
    chunk_id: &str,
) -> Result<Vec<CaptureEvent>, ChunkError> {
    let Some(first) = events.first() else {
        return Ok(Vec::new());
    };
    if chunk_size == 0 {
        return Err(ChunkError::InvalidChunkSize);
    }

    let session_id = first.session_id().ok_or(ChunkError::MissingSessionId)?.to_string();
    let window_id = first.prop(props::WINDOW_ID).cloned().unwrap_or(Value::Null);

    let payloads: Vec<Value> = events.iter().flat_map(CaptureEvent::snapshot_payloads).collect();
    let has_full_snapshot = payloads.iter().any(SnapshotType::is_full_snapshot);

    let compressed = compress(&serde_json::to_string(&payloads)?)?;
    let slices = slice_str(&compressed, chunk_size);
    let chunk_count = slices.len();

    tracing::debug!(
        session_id = %session_id,
        chunk_id,
        payloads = payloads.len(),
        compressed_len = compressed.len(),
        chunk_count,
        "chunked session payload"
    );

    slices
        .into_iter()
        .enumerate()
        .map(|(chunk_index, data)| {
            let record = ChunkRecord {
                chunk_id: chunk_id.to_string(),
                chunk_index,
                chunk_count,
                data: data.to_string(),
                compression: compression_tags::GZIP_BASE64.to_string(),
                has_full_snapshot,
            };

            let mut out = first.clone();
            // Stale payload keys from the source event.
            out.properties.remove(props::SNAPSHOT_ITEMS);
            out.properties.remove(props::SNAPSHOT_BYTES);
            out.properties.insert(props::SESSION_ID.into(), Value::String(session_id.clone()));
            out.properties.insert(props::WINDOW_ID.into(), window_id.clone());
            out.properties.insert(props::SNAPSHOT_DATA.into(), serde_json::to_value(&record)?);
            Ok::<_, ChunkError>(out)
        })
        .collect()
}

/// Fixed-length slices in order. Never cuts inside a character.
fn slice_str(s: &str, size: usize) -> Vec<&str> {
    let mut out = Vec::with_capacity(s.len() / size + 1);
    let mut start = 0;
    while start < s.len() {
        let mut end = (start + size).min(s.len());
        while !s.is_char_boundary(end) {
            end += 1;
        }
        out.push(&s[start..end]);
        start = end;
    }
    out
}
