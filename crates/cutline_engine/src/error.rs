use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unknown source: {0}")]
    UnknownSource(uuid::Uuid),

    #[error(transparent)]
    Core(#[from] cutline_core::error::CoreError),

    #[error(transparent)]
    Media(#[from] cutline_media::error::MediaError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
