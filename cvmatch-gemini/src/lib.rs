//! Gemini providers for the cvmatch pipeline.
//!
//! This crate implements [`cvmatch_core::EmbeddingProvider`] and
//! [`cvmatch_core::AnalysisGenerator`] against the Gemini REST API:
//!
//! - [`GeminiEmbeddings`] calls `batchEmbedContents` to embed CV chunks
//!   and queries.
//! - [`GeminiGenerator`] calls `generateContent` to write the candidate
//!   analysis narrative.
//!
//! Both providers read their API key from `GOOGLE_API_KEY` (with
//! `GEMINI_API_KEY` as a fallback) when built with `from_env`.

pub mod embeddings;
pub mod generator;
pub(crate) mod wire;

pub use embeddings::GeminiEmbeddings;
pub use generator::GeminiGenerator;
