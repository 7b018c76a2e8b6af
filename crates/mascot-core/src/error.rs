use thiserror::Error;

#[derive(Debug, Error)]
pub enum MascotError {
    #[error("OsmosMascot: Canvas with ID '{0}' not found.")]
    CanvasNotFound(String),
    #[error("OsmosMascot: 2D drawing context unavailable")]
    NoContext,
    #[error("OsmosMascot: invalid config: {0}")]
    Config(String),
    #[error("OsmosMascot: unknown event '{0}'")]
    UnknownEvent(String),
}
