use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Inference unavailable: {0}")]
    InferenceUnavailable(String),

    #[error("Inference timed out")]
    InferenceTimeout,

    #[error("Parse failure: {reason}")]
    ParseFailure { reason: String, raw: String },

    #[error("Empty instruction")]
    EmptyInstruction,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;
