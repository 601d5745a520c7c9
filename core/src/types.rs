use thiserror::Error;

use crate::batching::BatchError;
use crate::chunking::ChunkError;
use crate::compression::CompressionError;
use crate::config::ConfigError;
use crate::event::ClassifyError;

/// Unified error covering classification, codec, batching and config.
/// - `From<T>` impls enable `?` across layers.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("classify error: {0}")]
    Classify(#[from] ClassifyError),

    #[error("chunk error: {0}")]
    Chunk(#[from] ChunkError),

    #[error("batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
