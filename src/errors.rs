//! Error types for configuration, tree construction and segment sources.

use std::io;

/// Problems with a [`BuildConfig`](crate::config::BuildConfig), reported
/// before any recursion starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The partition method name is neither `"simple"` nor `"score"`.
    #[error("unknown partition method `{0}` (expected \"simple\" or \"score\")")]
    UnknownMethod(String),

    /// `max_depth` is above the hard recursion ceiling.
    #[error("max depth {requested} exceeds the limit of {limit}")]
    DepthLimit { requested: usize, limit: usize },

    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of [`BspBuilder::build`](crate::bsp::BspBuilder::build).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An input segment carries a NaN or infinite coordinate.
    #[error("segment `{id}` has a non-finite coordinate")]
    InvalidCoordinate { id: String },

    /// The cancel token was raised between two levels.
    #[error("build cancelled at depth {depth}")]
    Cancelled { depth: usize },
}

/// Errors raised while reading segments from text files or raw lumps.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Lump size is not a whole number of records.
    #[error("{lump} lump is {len} bytes, not a multiple of {stride}")]
    TruncatedLump {
        lump: &'static str,
        len: usize,
        stride: usize,
    },

    #[error("edge {edge} references vertex {index}, but only {count} vertices exist")]
    BadVertexIndex {
        edge: usize,
        index: usize,
        count: usize,
    },
}
