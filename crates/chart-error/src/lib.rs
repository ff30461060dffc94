use std::io;

use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serde_json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid UTF-8 sequence: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("system error: {0}")]
    System(String),

    #[error("Invalid message format: {0}")]
    InvalidMessage(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Unknown tool: {0}.")]
    ToolNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Chart generation timed out after {0}s")]
    GenerationTimeout(u64),

    #[error("{0}")]
    Internal(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("startup error: {0}")]
    Startup(String),
}

impl Error {
    /// Errors the dispatcher has already classified for the caller. These pass through
    /// the generation boundary untouched instead of being wrapped as internal failures.
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            Error::ToolNotFound(_) | Error::InvalidParameters(_) | Error::GenerationTimeout(_)
        )
    }
}

pub type Result<T> = core::result::Result<T, Error>;

pub type BoxError = Box<dyn std::error::Error + Sync + Send>;
