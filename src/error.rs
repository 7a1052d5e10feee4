// Level loading errors: file access, JSON decoding, event normalization

use thiserror::Error;

/// Errors raised while turning a level document into spawn events
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed level document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bullets[{index}].timeMs must be >= 0 (got {time_ms})")]
    NegativeTime { index: usize, time_ms: i32 },
}
