use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    // Network errors
    #[error("Network error: {0}")]
    Network(#[from] crate::http::HttpError),

    // Extraction errors
    #[error("Extraction failed for {archive}: {reason}")]
    Extraction { archive: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;
