use thiserror::Error;

#[derive(Error, Debug)]
pub enum HysteresisError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Branch data parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Linear algebra error: {0}")]
    LinAlg(String),
}

pub type HysteresisResult<T> = Result<T, HysteresisError>;
