use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("source unavailable ({location}): {reason}")]
    SourceUnavailable { location: String, reason: String },

    #[error("malformed document: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    #[error("invalid request limit {0}: must be a positive integer")]
    InvalidLimit(i64),

    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    SerializationFailure(#[source] serde_json::Error),

    #[error("chunk name {0:?} was already produced earlier in this run")]
    NameCollision(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SplitError>;
