use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to encode tile {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("definition.csv line {line}: {reason}")]
    Definition { line: usize, reason: String },

    #[error("no state provinces found on the map")]
    EmptyMask,

    #[error("failed to serialize province data: {0}")]
    Json(#[from] serde_json::Error),
}
