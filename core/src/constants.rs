//! constants.rs
//! Reserved event names, property keys and size defaults shared by every layer.

/// Event name of an unprocessed capture snapshot.
pub const SNAPSHOT_EVENT: &str = "$snapshot";
/// Event name of an adaptive batch.
pub const SNAPSHOT_ITEMS_EVENT: &str = "$snapshot_items";

/// Property keys used on capture events.
pub mod props {
    pub const DISTINCT_ID: &str      = "distinct_id";
    pub const SESSION_ID: &str       = "$session_id";
    pub const WINDOW_ID: &str        = "$window_id";
    pub const SNAPSHOT_DATA: &str    = "$snapshot_data";
    pub const SNAPSHOT_ITEMS: &str   = "$snapshot_items";
    pub const SNAPSHOT_BYTES: &str   = "$snapshot_bytes";
    pub const SNAPSHOT_SOURCE: &str  = "$snapshot_source";
    pub const LIB: &str              = "$lib";
}

/// Keys inside a chunk record.
pub mod chunk_keys {
    pub const CHUNK_ID: &str    = "chunk_id";
    pub const COMPRESSION: &str = "compression";
}

/// Legacy chunk slice length (512 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 512 * 1024;
/// Adaptive batch ceiling (1 MiB).
pub const DEFAULT_MAX_SIZE_BYTES: usize = 1024 * 1024;
/// Fraction of the ceiling a batch may occupy; the rest is framing margin.
pub const HEADROOM_FACTOR: f64 = 0.90;
/// Bisection rounds before remaining parts are emitted as-is.
pub const MAX_SPLIT_ROUNDS: usize = 10;
/// Library tag length cap, ellipsis included.
pub const LIB_TAG_MAX_LEN: usize = 1000;
pub const LIB_TAG_ELLIPSIS: &str = "...";

pub const DEFAULT_SNAPSHOT_SOURCE: &str = "web";
pub const DEFAULT_LIB: &str = "unknown";
