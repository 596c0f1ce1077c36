use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Unknown surface: {0}")]
    UnknownSurface(u32),

    #[error("Invalid pinned list: {0}")]
    InvalidPinnedList(String),
}

pub type Result<T> = std::result::Result<T, Error>;
