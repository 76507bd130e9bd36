use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Probe failed: {0}")]
    Probe(String),

    #[error("Player error: {0}")]
    Player(String),
}

pub type Result<T> = std::result::Result<T, MediaError>;
