use thiserror::Error;

/// Failures talking to the agent bridge
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Agent bridge returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A single frame that could not be understood
///
/// Frame errors never end a stream; the frame is logged and skipped.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Invalid UTF-8 in frame: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Malformed frame payload: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;
