//! event/classify.rs
//! Single-pass split of a capture stream into snapshot groups and everything else.
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::constants::SNAPSHOT_EVENT;
use crate::event::types::{CaptureEvent, EventShapeError, WindowKey};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("malformed event at position {index}: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: EventShapeError,
    },
}

/// Output of [`classify`].
#[derive(Debug, Default, Clone)]
pub struct ClassifiedEvents {
    /// Unprocessed snapshots per `(session, window)`, groups in first-seen order.
    pub snapshots: IndexMap<WindowKey, Vec<CaptureEvent>>,
    /// Everything else, untouched, in input order.
    pub others: Vec<CaptureEvent>,
}

impl ClassifiedEvents {
    pub fn snapshot_event_count(&self) -> usize {
        self.snapshots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty() && self.others.is_empty()
    }
}

/// `$snapshot` event whose payload has not been chunk-encoded yet.
pub fn is_unprocessed_snapshot(event: &CaptureEvent) -> Result<bool, EventShapeError> {
    if event.event != SNAPSHOT_EVENT {
        return Ok(false);
    }
    if !event.has_snapshot_payload() {
        return Err(EventShapeError::MissingSnapshotData);
    }
    Ok(!event.is_chunk_record())
}

/// Classify raw JSON events in one scan. Fails on the first malformed one.
pub fn classify<I>(events: I) -> Result<ClassifiedEvents, ClassifyError>
where
    I: IntoIterator<Item = Value>,
{
    let mut out = ClassifiedEvents::default();
    for (index, raw) in events.into_iter().enumerate() {
        let event = CaptureEvent::try_from(raw)
            .map_err(|source| ClassifyError::Malformed { index, source })?;
        route(&mut out, index, event)?;
    }
    log_summary(&out);
    Ok(out)
}

/// Classify already-typed events.
pub fn classify_captured<I>(events: I) -> Result<ClassifiedEvents, ClassifyError>
where
    I: IntoIterator<Item = CaptureEvent>,
{
    let mut out = ClassifiedEvents::default();
    for (index, event) in events.into_iter().enumerate() {
        route(&mut out, index, event)?;
    }
    log_summary(&out);
    Ok(out)
}

fn route(out: &mut ClassifiedEvents, index: usize, event: CaptureEvent) -> Result<(), ClassifyError> {
    let malformed = |source| ClassifyError::Malformed { index, source };

    if is_unprocessed_snapshot(&event).map_err(malformed)? {
        let key = WindowKey::of(&event).ok_or(malformed(EventShapeError::MissingSessionId))?;
        out.snapshots.entry(key).or_default().push(event);
    } else {
        out.others.push(event);
    }
    Ok(())
}

fn log_summary(out: &ClassifiedEvents) {
    tracing::debug!(
        groups = out.snapshots.len(),
        snapshots = out.snapshot_event_count(),
        others = out.others.len(),
        "classified capture events"
    );
}

/// Flat partition into `(unprocessed snapshots, others)`, both in input order.
pub fn split_replay_events<I>(events: I) -> Result<(Vec<CaptureEvent>, Vec<CaptureEvent>), ClassifyError>
where
    I: IntoIterator<Item = Value>,
{
    let mut replay = Vec::new();
    let mut other = Vec::new();

    for (index, raw) in events.into_iter().enumerate() {
        let malformed = |source| ClassifyError::Malformed { index, source };
        let event = CaptureEvent::try_from(raw).map_err(malformed)?;
        if is_unprocessed_snapshot(&event).map_err(malformed)? {
            replay.push(event);
        } else {
            other.push(event);
        }
    }

    Ok((replay, other))
}
