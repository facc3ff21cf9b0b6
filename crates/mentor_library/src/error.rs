use thiserror::Error;

/// Library layer error types
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend rejected the request (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("No se pudo eliminar: permiso denegado por el servidor o el libro ya no existe")]
    DeleteRejected,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, LibraryError>;
