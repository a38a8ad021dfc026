use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("failed to parse settings: {0}")]
    SettingsFormat(#[from] serde_json::Error),
    #[error("unknown intent `{0}`")]
    UnknownIntent(String),
}

pub type Result<T> = std::result::Result<T, Error>;
