use liteworkspace_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LiteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Plugin error: {0}")]
    Plugin(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for LiteError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        LiteError::Plugin(err.to_string())
    }
}

impl From<toml::de::Error> for LiteError {
    fn from(err: toml::de::Error) -> Self {
        LiteError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LiteError>;
