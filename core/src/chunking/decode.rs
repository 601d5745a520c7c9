//! chunking/decode.rs
//! Two-phase reassembly of chunked snapshot rows.
//!
//! Phase 1 partitions rows into plain payloads and per-id collectors.
//! Phase 2 validates each collector and decodes it, or drops it whole.
use std::collections::{btree_map, BTreeMap, BTreeSet};

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde_json::Value;

use crate::chunking::types::{
    ChunkError, ChunkRecord, DecodeOptions, DecodedRecording, DropReason, DroppedChunkGroup,
    IngestedSnapshot, WindowedSnapshot,
};
use crate::compression::text::units_to_string;
use crate::compression::{create_codec, CompressionTag, TextCodec};
use crate::telemetry::DecodeCounters;

/// Records collected for one chunk id. First record seen per index wins.
#[derive(Debug)]
struct ChunkGroup {
    window_id: Option<String>,
    tag: Option<CompressionTag>,
    declared_counts: BTreeSet<usize>,
    by_index: BTreeMap<usize, ChunkRecord>,
}

impl ChunkGroup {
    fn new(window_id: Option<String>) -> Self {
        Self { window_id, tag: None, declared_counts: BTreeSet::new(), by_index: BTreeMap::new() }
    }

    /// Returns `Ok(false)` for a duplicate index. Every record's tag is checked,
    /// so an unknown or mixed tag fails even when the group is later dropped.
    fn insert(&mut self, chunk_id: &str, record: ChunkRecord) -> Result<bool, ChunkError> {
        let tag = CompressionTag::parse(&record.compression)?;
        match self.tag {
            None => self.tag = Some(tag),
            Some(t) if t != tag => {
                return Err(ChunkError::MixedCompression { chunk_id: chunk_id.to_string() })
            }
            Some(_) => {}
        }

        self.declared_counts.insert(record.chunk_count);
        match self.by_index.entry(record.chunk_index) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(true)
            }
            btree_map::Entry::Occupied(_) => Ok(false),
        }
    }

    fn validate(&self) -> Result<(), DropReason> {
        if self.declared_counts.len() != 1 {
            return Err(DropReason::InconsistentChunkCount {
                counts: self.declared_counts.iter().copied().collect(),
            });
        }
        let expected = self.declared_counts.iter().next().copied().unwrap_or(0);
        let observed = self.by_index.range(..expected).count();
        if expected == 0 || observed != expected || self.by_index.len() != expected {
            return Err(DropReason::Incomplete { expected, observed });
        }
        Ok(())
    }

    fn decode(self, counters: &mut DecodeCounters) -> Result<Vec<Value>, ChunkError> {
        let Some(tag) = self.tag else {
            return Ok(Vec::new());
        };
        let joined: String = self.by_index.values().map(|r| r.data.as_str()).collect();

        let units = create_codec(tag).decode(&joined)?;
        let text = units_to_string(&units)?;

        counters.bytes_compressed += joined.len() as u64;
        counters.bytes_decompressed += text.len() as u64;

        Ok(serde_json::from_str::<Vec<Value>>(&text)?)
    }
}

enum Unit {
    Plain(IngestedSnapshot),
    Group(String),
}

/// Reassemble a session's stored rows into playable payloads.
///
/// Rows without a `chunk_id` pass through unchanged. Chunk groups are emitted
/// at the position of their first row. Incomplete groups are dropped and
/// reported, never partially reconstructed. Unknown or mixed compression tags
/// are a hard error whether or not the group is complete.
pub fn decompress_chunked<I>(records: I, options: &DecodeOptions) -> Result<DecodedRecording, ChunkError>
where
    I: IntoIterator<Item = IngestedSnapshot>,
{
    let mut out = DecodedRecording::default();

    // --- phase 1: partition ---
    let mut units: Vec<Unit> = Vec::new();
    let mut groups: IndexMap<String, ChunkGroup> = IndexMap::new();

    for (position, record) in records.into_iter().enumerate() {
        out.counters.records += 1;

        let Some(chunk_id) = record.chunk_id().map(str::to_string) else {
            out.counters.plain_records += 1;
            units.push(Unit::Plain(record));
            continue;
        };

        let chunk = ChunkRecord::from_value(&record.snapshot_data)
            .map_err(|source| ChunkError::MalformedRecord { position, source })?;
        out.counters.chunks_seen += 1;

        let group = match groups.entry(chunk_id.clone()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                units.push(Unit::Group(e.key().clone()));
                e.insert(ChunkGroup::new(record.window_id.clone()))
            }
        };
        if !group.insert(&chunk_id, chunk)? {
            out.counters.duplicate_chunks += 1;
        }
    }

    // --- phase 2: validate + decode ---
    let mut decoded_units = 0usize;

    for unit in units {
        if options.limit.is_some_and(|limit| decoded_units >= limit) {
            break;
        }

        match unit {
            Unit::Plain(record) => {
                out.snapshots.push(WindowedSnapshot {
                    window_id: record.window_id,
                    data: record.snapshot_data,
                });
                decoded_units += 1;
            }
            Unit::Group(chunk_id) => {
                let Some(group) = groups.swap_remove(&chunk_id) else {
                    continue;
                };

                if let Err(reason) = group.validate() {
                    tracing::warn!(
                        session_id = ?options.session_id,
                        window_id = ?group.window_id,
                        chunk_id = %chunk_id,
                        reason = ?reason,
                        "dropping chunk group that cannot be reassembled"
                    );
                    out.counters.groups_dropped += 1;
                    out.dropped.push(DroppedChunkGroup {
                        chunk_id,
                        window_id: group.window_id,
                        reason,
                    });
                    continue;
                }

                let window_id = group.window_id.clone();
                let items = group.decode(&mut out.counters)?;
                out.snapshots.extend(
                    items.into_iter().map(|data| WindowedSnapshot { window_id: window_id.clone(), data }),
                );
                out.counters.groups_decoded += 1;
                decoded_units += 1;
            }
        }
    }

    Ok(out)
}
