//! config.rs
//! Runtime-tunable size and compatibility knobs.
//!
//! Every field is optional when deserializing; missing fields fall back to the
//! values in `constants.rs`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_MAX_SIZE_BYTES, DEFAULT_SNAPSHOT_SOURCE, HEADROOM_FACTOR,
    LIB_TAG_ELLIPSIS, LIB_TAG_MAX_LEN, MAX_SPLIT_ROUNDS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config field `{field}`: {msg}")]
    Invalid { field: &'static str, msg: String },

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Legacy codec slice length in bytes of compressed text.
    pub chunk_size: usize,
    /// Adaptive batch ceiling before headroom.
    pub max_size_bytes: usize,
    /// Share of `max_size_bytes` a batch may fill, in `(0, 1]`.
    pub headroom_factor: f64,
    /// Bisection rounds before the splitter gives up.
    pub max_split_rounds: usize,
    /// `$lib` truncation length, ellipsis included.
    pub lib_max_len: usize,
    /// `$snapshot_source` used when the first event of a group has none.
    pub default_snapshot_source: String,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            headroom_factor: HEADROOM_FACTOR,
            max_split_rounds: MAX_SPLIT_ROUNDS,
            lib_max_len: LIB_TAG_MAX_LEN,
            default_snapshot_source: DEFAULT_SNAPSHOT_SOURCE.to_string(),
        }
    }
}

impl ReplayConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: ReplayConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_size_bytes(mut self, max_size_bytes: usize) -> Self {
        self.max_size_bytes = max_size_bytes;
        self
    }

    pub fn with_headroom_factor(mut self, headroom_factor: f64) -> Self {
        self.headroom_factor = headroom_factor;
        self
    }

    pub fn with_max_split_rounds(mut self, rounds: usize) -> Self {
        self.max_split_rounds = rounds;
        self
    }

    /// Byte budget a batch must stay under.
    pub fn size_with_headroom(&self) -> usize {
        (self.max_size_bytes as f64 * self.headroom_factor).floor() as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid { field: "chunk_size", msg: "must be > 0".into() });
        }
        if self.max_size_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_size_bytes", msg: "must be > 0".into() });
        }
        if !(self.headroom_factor > 0.0 && self.headroom_factor <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "headroom_factor",
                msg: format!("{} not in (0, 1]", self.headroom_factor),
            });
        }
        if self.max_split_rounds == 0 {
            return Err(ConfigError::Invalid { field: "max_split_rounds", msg: "must be > 0".into() });
        }
        if self.lib_max_len <= LIB_TAG_ELLIPSIS.len() {
            return Err(ConfigError::Invalid {
                field: "lib_max_len",
                msg: format!("must exceed ellipsis length {}", LIB_TAG_ELLIPSIS.len()),
            });
        }
        Ok(())
    }
}
