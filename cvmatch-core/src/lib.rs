//! CV screening pipeline for small candidate batches.
//!
//! This crate takes a batch of CV files, turns them into an embedded
//! relevance index, and answers screening questions with a generated
//! narrative backed by per-candidate evidence:
//!
//! - PDF text extraction behind the [`PdfPageExtractor`] seam
//! - candidate name extraction with a file-name fallback
//! - recursive overlap chunking sized for retrieval
//! - an immutable in-memory cosine index per batch
//! - rule-based query gating before any model call
//! - narrative generation classified via response markers
//!
//! [`CvMatcher`] ties the steps together; the embedding and generation
//! backends stay behind traits so tests run without network access.

pub mod chunking;
pub mod classifier;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod generation;
pub mod index;
pub mod matcher;
pub mod names;
pub mod prompts;
pub mod uploads;

pub use chunking::RecursiveChunker;
pub use classifier::{classify_question, is_question_irrelevant, QuestionVerdict};
pub use config::{MatchConfig, MatchConfigBuilder};
pub use document::{CandidateDocument, CandidateEvidence, Chunk, MatchReport, RankedCandidate};
pub use embedding::EmbeddingProvider;
pub use error::{MatchError, Result};
pub use extract::{extract_document_text, LopdfExtractor, PageExtractionError, PdfPageExtractor};
pub use generation::{AnalysisGenerator, Narrative};
pub use index::RelevanceIndex;
pub use matcher::{CvMatcher, MatcherBuilder};
pub use names::extract_candidate_name;
pub use uploads::{sanitize_file_name, StagedUpload, UploadStore};
