use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while screening a CV batch.
#[derive(Error, Debug)]
pub enum MatchError {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A batch outside the accepted candidate count range
    #[error("Batch of {actual} CVs rejected: expected between {min} and {max}")]
    BatchSize { min: usize, max: usize, actual: usize },

    /// A CV path that does not exist on disk
    #[error("CV file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Error while pulling text out of a PDF
    #[error("Text extraction failed for '{file}': {source}")]
    Extraction {
        file: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error from an embedding provider
    #[error("Embedding error from {provider}: {message}")]
    Embedding { provider: String, message: String },

    /// Error while building the relevance index
    #[error("Index build error: {0}")]
    IndexBuild(String),

    /// Error during retrieval
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Error from the analysis generator
    #[error("Generation error from {provider}: {message}")]
    Generation { provider: String, message: String },

    /// Filesystem error in the uploads area
    #[error("Uploads error at '{}': {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for screening operations
pub type Result<T> = std::result::Result<T, MatchError>;
