use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShporaError {
    #[error("Transcript unavailable for {video_ref}: {reason}")]
    TranscriptUnavailable { video_ref: String, reason: String },

    #[error("Summary generation failed: {reason}")]
    SummaryGenerationFailed { reason: String },

    #[error("Quiz generation failed: {reason}")]
    QuizGenerationFailed { reason: String },

    #[error("Answer index {index} out of range for a quiz of {len} questions")]
    InvalidIndex { index: usize, len: usize },

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ShporaError>;
