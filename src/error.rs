use thiserror::Error;

#[derive(Error, Debug)]
pub enum StandardizeError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StandardizeError>;
