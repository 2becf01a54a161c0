use thiserror::Error;

/// Failures surfaced by the playback adapter.
///
/// `Clone` so one shared SDK load can hand the same failure to every waiter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerError {
    #[error("Failed to load player SDK: {0}")]
    SdkLoad(String),

    #[error("Failed to initialize player: {0}")]
    Construction(String),

    #[error("Player is not ready")]
    NotReady,

    #[error("Player has been destroyed")]
    Destroyed,

    #[error("Player read failed: {0}")]
    Read(String),
}

/// Failures from the marker / video metadata services.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown video: {0}")]
    UnknownVideo(String),
}
