use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why a generation attempt produced no test.
#[derive(Error, Debug)]
pub enum GenerationFailed {
    #[error("prompt has {size} characters, limit is {limit}")]
    PromptTooLarge { size: usize, limit: usize },

    #[error("no answer within {0:?}")]
    Timeout(Duration),

    #[error("generation cancelled")]
    Cancelled,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("service answered HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("service rejected the credentials (HTTP {status})")]
    Auth { status: u16 },

    #[error("service quota exhausted")]
    Quota,

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for GenerationFailed {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GenerationFailed::MalformedResponse(err.to_string())
        } else {
            GenerationFailed::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationFailed>;
