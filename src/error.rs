//! Error types for sitescope

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Domain is required")]
    InvalidDomain,

    #[error("Site map request failed for {url}: {message}")]
    MapFailed { url: String, message: String },

    #[error("Labeling service error: {0}")]
    LabelingError(String),

    #[error("Extract job {status}: {message}")]
    ExtractJobFailed { status: String, message: String },

    #[error("Extract job timed out after {0} attempts")]
    ExtractJobTimeout(u32),

    #[error("Classification failed for batch {batch}: {message}")]
    ClassificationFailed { batch: usize, message: String },

    #[error("No meaningful keywords found in URLs")]
    NoKeywords,

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("OpenAI API error: {0}")]
    OpenAiError(#[from] async_openai::error::OpenAIError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
