use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to read or parse an edge-list source.
///
/// A load that fails returns no graph at all, never a partial one.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read graph source {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: malformed edge record '{record}' (expected <from><to><latency>, e.g. AB5)")]
    MalformedRecord { line: usize, record: String },

    #[error("line {line}: invalid latency in edge record '{record}'")]
    InvalidLatency {
        line: usize,
        record: String,
        #[source]
        source: ParseIntError,
    },
}

pub type Result<T> = std::result::Result<T, LoadError>;
