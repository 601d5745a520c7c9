//! event/types.rs
//! Capture events, snapshot type tags and group keys.
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::{chunk_keys, props};

/// Structural problems with a single capture event.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum EventShapeError {
    #[error("event is not a JSON object")]
    NotAnObject,
    #[error("event has no string `event` name")]
    MissingEventName,
    #[error("event has no `properties` object")]
    MissingProperties,
    #[error("`$snapshot` event carries neither `$snapshot_data` nor `$snapshot_items`")]
    MissingSnapshotData,
    #[error("snapshot event has no string `$session_id`")]
    MissingSessionId,
}

/// rrweb event type tags carried in a payload's `type` field.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum SnapshotType {
    DomContentLoaded    = 0,
    Load                = 1,
    FullSnapshot        = 2,
    IncrementalSnapshot = 3,
    Meta                = 4,
    Custom              = 5,
    Plugin              = 6,
}

impl SnapshotType {
    /// Read the tag of a payload. Missing or unknown tags yield `None`.
    pub fn of(payload: &Value) -> Option<SnapshotType> {
        let raw = payload.get("type")?.as_u64()?;
        let raw = u8::try_from(raw).ok()?;
        SnapshotType::try_from_primitive(raw).ok()
    }

    pub fn is_full_snapshot(payload: &Value) -> bool {
        SnapshotType::of(payload) == Some(SnapshotType::FullSnapshot)
    }
}

/// A named event with its properties. Every other top-level field rides in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureEvent {
    pub event: String,
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CaptureEvent {
    pub fn new(event: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self { event: event.into(), properties, extra: Map::new() }
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.prop_str(props::SESSION_ID)
    }

    pub fn window_id(&self) -> Option<&str> {
        self.prop_str(props::WINDOW_ID)
    }

    pub fn distinct_id(&self) -> Option<&Value> {
        self.prop(props::DISTINCT_ID)
    }

    pub fn has_snapshot_payload(&self) -> bool {
        self.properties.contains_key(props::SNAPSHOT_DATA)
            || self.properties.contains_key(props::SNAPSHOT_ITEMS)
    }

    /// `$snapshot_data` is already a chunk record.
    pub fn is_chunk_record(&self) -> bool {
        self.prop(props::SNAPSHOT_DATA)
            .and_then(Value::as_object)
            .map(|data| data.contains_key(chunk_keys::COMPRESSION))
            .unwrap_or(false)
    }

    /// Explicit serialized size reported by the client, when present.
    pub fn snapshot_bytes_hint(&self) -> Option<usize> {
        self.prop(props::SNAPSHOT_BYTES)
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
    }

    /// Payloads flattened one level, cloned.
    pub fn snapshot_payloads(&self) -> Vec<Value> {
        let mut out = Vec::new();
        for key in [props::SNAPSHOT_DATA, props::SNAPSHOT_ITEMS] {
            if let Some(v) = self.properties.get(key) {
                flatten_into(v.clone(), &mut out);
            }
        }
        out
    }

    /// Payloads flattened one level, moved out of the event.
    pub fn into_snapshot_payloads(mut self) -> Vec<Value> {
        let mut out = Vec::new();
        for key in [props::SNAPSHOT_DATA, props::SNAPSHOT_ITEMS] {
            if let Some(v) = self.properties.remove(key) {
                flatten_into(v, &mut out);
            }
        }
        out
    }

    pub fn into_value(self) -> Value {
        Value::from(self)
    }
}

fn flatten_into(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => out.extend(items),
        Value::Null => {}
        other => out.push(other),
    }
}

impl TryFrom<Value> for CaptureEvent {
    type Error = EventShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut obj) = value else {
            return Err(EventShapeError::NotAnObject);
        };
        let event = match obj.remove("event") {
            Some(Value::String(name)) => name,
            _ => return Err(EventShapeError::MissingEventName),
        };
        let properties = match obj.remove("properties") {
            Some(Value::Object(p)) => p,
            _ => return Err(EventShapeError::MissingProperties),
        };
        Ok(Self { event, properties, extra: obj })
    }
}

impl From<CaptureEvent> for Value {
    fn from(ev: CaptureEvent) -> Self {
        let mut obj = Map::with_capacity(ev.extra.len() + 2);
        obj.insert("event".into(), Value::String(ev.event));
        obj.insert("properties".into(), Value::Object(ev.properties));
        obj.extend(ev.extra);
        Value::Object(obj)
    }
}

/// Packing and chunking scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowKey {
    pub session_id: String,
    pub window_id: Option<String>,
}

impl WindowKey {
    pub fn new(session_id: impl Into<String>, window_id: Option<String>) -> Self {
        Self { session_id: session_id.into(), window_id }
    }

    pub fn of(event: &CaptureEvent) -> Option<Self> {
        let session_id = event.session_id()?;
        Some(Self::new(session_id, event.window_id().map(str::to_string)))
    }

    /// Window id, falling back to the session id.
    pub fn window_id_or_session(&self) -> &str {
        self.window_id.as_deref().unwrap_or(&self.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_type_reads_numeric_tag() {
        assert_eq!(SnapshotType::of(&json!({"type": 2})), Some(SnapshotType::FullSnapshot));
        assert_eq!(SnapshotType::of(&json!({"type": 42})), None);
        assert_eq!(SnapshotType::of(&json!({"type": "2"})), None);
        assert_eq!(SnapshotType::of(&json!({})), None);
    }

    #[test]
    fn value_conversion_keeps_extra_fields() {
        let raw = json!({"event": "$pageview", "properties": {"a": 1}, "uuid": "u-1"});
        let ev = CaptureEvent::try_from(raw.clone()).unwrap();
        assert_eq!(ev.extra.get("uuid"), Some(&json!("u-1")));
        assert_eq!(Value::from(ev), raw);
    }

    #[test]
    fn payloads_flatten_one_level() {
        let ev = CaptureEvent::try_from(json!({
            "event": "$snapshot",
            "properties": {"$snapshot_data": [{"type": 3}, {"type": 4}]}
        }))
        .unwrap();
        assert_eq!(ev.snapshot_payloads(), vec![json!({"type": 3}), json!({"type": 4})]);

        let single = CaptureEvent::try_from(json!({
            "event": "$snapshot",
            "properties": {"$snapshot_data": {"type": 2}}
        }))
        .unwrap();
        assert_eq!(single.into_snapshot_payloads(), vec![json!({"type": 2})]);
    }

    #[test]
    fn missing_shape_is_reported() {
        assert_eq!(CaptureEvent::try_from(json!([1])), Err(EventShapeError::NotAnObject));
        assert_eq!(
            CaptureEvent::try_from(json!({"properties": {}})),
            Err(EventShapeError::MissingEventName)
        );
        assert_eq!(
            CaptureEvent::try_from(json!({"event": "$snapshot"})),
            Err(EventShapeError::MissingProperties)
        );
    }

    #[test]
    fn negative_hint_is_ignored() {
        let ev = CaptureEvent::try_from(json!({
            "event": "$snapshot",
            "properties": {"$snapshot_bytes": -5, "$snapshot_data": {}}
        }))
        .unwrap();
        assert_eq!(ev.snapshot_bytes_hint(), None);
    }
}
