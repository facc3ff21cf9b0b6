use thiserror::Error;

/// Tutoring engine error types
#[derive(Error, Debug)]
pub enum MentorError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("No API key found. Set GEMINI_API_KEY environment variable.")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for tutoring operations
pub type Result<T> = std::result::Result<T, MentorError>;
