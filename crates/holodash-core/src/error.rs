use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoloDashError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HoloDashError>;
