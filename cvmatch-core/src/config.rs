//! Configuration for the screening pipeline.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// Default model for chunk and query embeddings.
pub const DEFAULT_EMBEDDING_MODEL: &str = "gemini-embedding-001";
/// Default model for narrative generation.
pub const DEFAULT_GENERATIVE_MODEL: &str = "gemini-2.5-flash";
/// Default sampling temperature. Kept low so analyses stay grounded in the
/// retrieved excerpts.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
/// Default maximum chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 600;
/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;
/// Default number of chunks retrieved per query.
pub const DEFAULT_TOP_K: usize = 15;
/// Default smallest accepted batch.
pub const DEFAULT_MIN_CVS: usize = 2;
/// Default largest accepted batch.
pub const DEFAULT_MAX_CVS: usize = 5;
/// Default directory for staged CVs.
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";

/// Configuration parameters for a screening session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Model used to embed chunks and queries.
    pub embedding_model: String,
    /// Model used to generate the analysis narrative.
    pub generative_model: String,
    /// Sampling temperature for narrative generation.
    pub temperature: f32,
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per query.
    pub top_k: usize,
    /// Smallest batch the matcher will accept.
    pub min_cvs: usize,
    /// Largest batch the matcher will accept.
    pub max_cvs: usize,
    /// Directory where staged CVs live.
    pub uploads_dir: PathBuf,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            generative_model: DEFAULT_GENERATIVE_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
            min_cvs: DEFAULT_MIN_CVS,
            max_cvs: DEFAULT_MAX_CVS,
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
        }
    }
}

impl MatchConfig {
    /// Create a new builder for constructing a [`MatchConfig`].
    pub fn builder() -> MatchConfigBuilder {
        MatchConfigBuilder::default()
    }

    /// Build a config from `CVMATCH_*` environment variables, falling back to
    /// the defaults for anything unset.
    ///
    /// Recognized variables: `CVMATCH_EMBEDDING_MODEL`,
    /// `CVMATCH_GENERATIVE_MODEL`, `CVMATCH_TEMPERATURE`,
    /// `CVMATCH_CHUNK_SIZE`, `CVMATCH_CHUNK_OVERLAP`, `CVMATCH_TOP_K`,
    /// `CVMATCH_MIN_CVS`, `CVMATCH_MAX_CVS`, `CVMATCH_UPLOADS_DIR`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(model) = lookup("CVMATCH_EMBEDDING_MODEL") {
            builder = builder.embedding_model(model);
        }
        if let Some(model) = lookup("CVMATCH_GENERATIVE_MODEL") {
            builder = builder.generative_model(model);
        }
        if let Some(raw) = lookup("CVMATCH_TEMPERATURE") {
            builder = builder.temperature(parse_var("CVMATCH_TEMPERATURE", &raw)?);
        }
        if let Some(raw) = lookup("CVMATCH_CHUNK_SIZE") {
            builder = builder.chunk_size(parse_var("CVMATCH_CHUNK_SIZE", &raw)?);
        }
        if let Some(raw) = lookup("CVMATCH_CHUNK_OVERLAP") {
            builder = builder.chunk_overlap(parse_var("CVMATCH_CHUNK_OVERLAP", &raw)?);
        }
        if let Some(raw) = lookup("CVMATCH_TOP_K") {
            builder = builder.top_k(parse_var("CVMATCH_TOP_K", &raw)?);
        }
        if let Some(raw) = lookup("CVMATCH_MIN_CVS") {
            builder = builder.min_cvs(parse_var("CVMATCH_MIN_CVS", &raw)?);
        }
        if let Some(raw) = lookup("CVMATCH_MAX_CVS") {
            builder = builder.max_cvs(parse_var("CVMATCH_MAX_CVS", &raw)?);
        }
        if let Some(dir) = lookup("CVMATCH_UPLOADS_DIR") {
            builder = builder.uploads_dir(dir);
        }
        builder.build()
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| MatchError::Config(format!("invalid value for {key}: {e}")))
}

/// Builder for constructing a validated [`MatchConfig`].
#[derive(Debug, Clone, Default)]
pub struct MatchConfigBuilder {
    config: MatchConfig,
}

impl MatchConfigBuilder {
    /// Set the embedding model.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.embedding_model = model.into();
        self
    }

    /// Set the generative model.
    pub fn generative_model(mut self, model: impl Into<String>) -> Self {
        self.config.generative_model = model.into();
        self
    }

    /// Set the sampling temperature for narrative generation.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of chunks retrieved per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the smallest accepted batch.
    pub fn min_cvs(mut self, min: usize) -> Self {
        self.config.min_cvs = min;
        self
    }

    /// Set the largest accepted batch.
    pub fn max_cvs(mut self, max: usize) -> Self {
        self.config.max_cvs = max;
        self
    }

    /// Set the directory where staged CVs live.
    pub fn uploads_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.uploads_dir = dir.into();
        self
    }

    /// Build the [`MatchConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Config`] if:
    /// - `chunk_size == 0`
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `min_cvs == 0` or `min_cvs > max_cvs`
    /// - `temperature` is outside `0.0..=2.0`
    pub fn build(self) -> Result<MatchConfig> {
        if self.config.chunk_size == 0 {
            return Err(MatchError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(MatchError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(MatchError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.min_cvs == 0 {
            return Err(MatchError::Config("min_cvs must be greater than zero".to_string()));
        }
        if self.config.min_cvs > self.config.max_cvs {
            return Err(MatchError::Config(format!(
                "min_cvs ({}) must not exceed max_cvs ({})",
                self.config.min_cvs, self.config.max_cvs
            )));
        }
        if !(0.0..=2.0).contains(&self.config.temperature) {
            return Err(MatchError::Config(format!(
                "temperature ({}) must be within 0.0..=2.0",
                self.config.temperature
            )));
        }
        Ok(self.config)
    }
}
