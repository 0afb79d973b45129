use std::path::PathBuf;

use thiserror::Error;

/// Errors crossing the fetch boundary. The layout engine itself is total
/// over its input domain and raises nothing; malformed shapes and unknown
/// categories resolve to fallbacks instead.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend rejected the model: {0}")]
    Backend(String),

    #[error("could not read model file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("model JSON was malformed: {0}")]
    Json(#[from] serde_json::Error),
}
