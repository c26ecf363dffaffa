//! Screening pipeline orchestrator.
//!
//! The [`CvMatcher`] coordinates the full batch-and-query workflow by
//! composing a [`PdfPageExtractor`], an [`EmbeddingProvider`] and an
//! [`AnalysisGenerator`]. A matcher is bound to one ingested CV batch;
//! screening a different batch means building a new matcher.
//!
//! # Example
//!
//! ```rust,ignore
//! use cvmatch_core::{CvMatcher, MatchConfig, LopdfExtractor};
//!
//! let matcher = CvMatcher::builder()
//!     .config(MatchConfig::default())
//!     .pdf_extractor(Arc::new(LopdfExtractor))
//!     .embeddings(Arc::new(embedder))
//!     .generator(Arc::new(generator))
//!     .ingest(&cv_paths)
//!     .await?;
//!
//! let report = matcher.find_matching_candidates("Who knows Rust?").await?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::chunking::RecursiveChunker;
use crate::config::MatchConfig;
use crate::document::{CandidateDocument, CandidateEvidence, Chunk, MatchReport, RankedCandidate};
use crate::embedding::EmbeddingProvider;
use crate::error::{MatchError, Result};
use crate::extract::{extract_document_text, PdfPageExtractor};
use crate::generation::{AnalysisGenerator, Narrative};
use crate::index::RelevanceIndex;
use crate::names::extract_candidate_name;
use crate::prompts::render_analysis_prompt;

/// The screening pipeline, bound to one ingested CV batch.
///
/// Construct one via [`CvMatcher::builder()`].
pub struct CvMatcher {
    config: MatchConfig,
    generator: Arc<dyn AnalysisGenerator>,
    index: RelevanceIndex,
    documents: Vec<CandidateDocument>,
}

impl std::fmt::Debug for CvMatcher {
    // Manual impl: `Arc<dyn AnalysisGenerator>` is not `Debug`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CvMatcher")
            .field("config", &self.config)
            .field("index", &self.index)
            .field("documents", &self.documents)
            .finish_non_exhaustive()
    }
}

impl CvMatcher {
    /// Create a new [`MatcherBuilder`].
    pub fn builder() -> MatcherBuilder {
        MatcherBuilder::default()
    }

    /// Return a reference to the matcher configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// The ingested CVs, in batch order.
    pub fn documents(&self) -> &[CandidateDocument] {
        &self.documents
    }

    /// Candidate names in batch order.
    pub fn candidates(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.candidate_name.clone()).collect()
    }

    /// Number of chunks in the relevance index.
    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    /// Answer one screening query: retrieve → generate → group evidence.
    ///
    /// Retrieval happens exactly once per query; the same retrieved set
    /// feeds both the prompt context and the evidence grouping, so the
    /// narrative and the ranking can never drift apart.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Retrieval`] if query embedding fails and
    /// [`MatchError::Generation`] if the generator backend fails. The
    /// matcher stays usable after either.
    pub async fn find_matching_candidates(&self, query: &str) -> Result<MatchReport> {
        // 1. Retrieve the most relevant chunks across the whole batch
        let retrieved = self.index.query(query, self.config.top_k).await?;

        // 2. Build the prompt from the retrieved excerpts
        let context =
            retrieved.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join("\n\n");
        let prompt = render_analysis_prompt(&context, query);

        // 3. Generate and classify the narrative
        let raw = self.generator.generate(&prompt).await.map_err(|e| {
            error!(error = %e, "narrative generation failed");
            e
        })?;
        let narrative = Narrative::from_generated(&raw);

        // 4. Group the same retrieved set into per-candidate evidence
        let (evidence, ranking) = group_evidence(&retrieved);

        info!(
            retrieved = retrieved.len(),
            ranked = ranking.len(),
            general = narrative.is_general(),
            "query answered"
        );
        Ok(MatchReport { narrative, evidence, ranking, candidates: self.candidates() })
    }
}

/// Group retrieved chunks per candidate and derive the ranking.
///
/// Evidence keeps first-retrieved candidate order; the ranking sorts by
/// match count descending, ties keeping that same order (stable sort).
fn group_evidence(retrieved: &[Chunk]) -> (Vec<CandidateEvidence>, Vec<RankedCandidate>) {
    let mut evidence: Vec<CandidateEvidence> = Vec::new();
    for chunk in retrieved {
        match evidence.iter_mut().find(|e| e.candidate_name == chunk.candidate_name) {
            Some(entry) => entry.excerpts.push(chunk.text.clone()),
            None => evidence.push(CandidateEvidence {
                candidate_name: chunk.candidate_name.clone(),
                excerpts: vec![chunk.text.clone()],
            }),
        }
    }

    let mut ranking: Vec<RankedCandidate> = evidence
        .iter()
        .map(|e| RankedCandidate {
            candidate_name: e.candidate_name.clone(),
            matches: e.excerpts.len(),
        })
        .collect();
    ranking.sort_by(|a, b| b.matches.cmp(&a.matches));

    (evidence, ranking)
}

/// Builder for constructing a [`CvMatcher`] over one CV batch.
///
/// All fields are required. The terminal [`ingest`](MatcherBuilder::ingest)
/// call validates the batch, extracts and chunks every CV, and builds the
/// relevance index.
#[derive(Default)]
pub struct MatcherBuilder {
    config: Option<MatchConfig>,
    pdf_extractor: Option<Arc<dyn PdfPageExtractor>>,
    embeddings: Option<Arc<dyn EmbeddingProvider>>,
    generator: Option<Arc<dyn AnalysisGenerator>>,
}

impl MatcherBuilder {
    /// Set the matcher configuration.
    pub fn config(mut self, config: MatchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the PDF text extractor.
    pub fn pdf_extractor(mut self, extractor: Arc<dyn PdfPageExtractor>) -> Self {
        self.pdf_extractor = Some(extractor);
        self
    }

    /// Set the embedding provider.
    pub fn embeddings(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embeddings = Some(provider);
        self
    }

    /// Set the narrative generator.
    pub fn generator(mut self, generator: Arc<dyn AnalysisGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Ingest a CV batch and build the matcher.
    ///
    /// The batch size is validated before any file is touched. Each CV is
    /// then extracted, named and chunked, and the whole chunk set is
    /// embedded into the relevance index.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Config`] if a required field is missing,
    /// [`MatchError::BatchSize`] for a batch outside the configured bounds,
    /// and the underlying extraction or index error for a failing CV.
    pub async fn ingest(self, paths: &[PathBuf]) -> Result<CvMatcher> {
        let config =
            self.config.ok_or_else(|| MatchError::Config("config is required".to_string()))?;
        let extractor = self
            .pdf_extractor
            .ok_or_else(|| MatchError::Config("pdf_extractor is required".to_string()))?;
        let embeddings = self
            .embeddings
            .ok_or_else(|| MatchError::Config("embeddings is required".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| MatchError::Config("generator is required".to_string()))?;

        // 1. Validate the batch before any file work
        if paths.len() < config.min_cvs || paths.len() > config.max_cvs {
            return Err(MatchError::BatchSize {
                min: config.min_cvs,
                max: config.max_cvs,
                actual: paths.len(),
            });
        }

        // 2. Extract, name and chunk every CV
        let chunker = RecursiveChunker::new(config.chunk_size, config.chunk_overlap);
        let mut documents = Vec::with_capacity(paths.len());
        let mut chunks: Vec<Chunk> = Vec::new();
        for path in paths {
            let text = extract_document_text(extractor.as_ref(), path).map_err(|e| {
                error!(path = %path.display(), error = %e, "CV ingestion failed");
                e
            })?;
            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            let candidate_name = extract_candidate_name(&text, file_name);

            let before = chunks.len();
            for piece in chunker.split(&text) {
                chunks.push(Chunk {
                    text: piece,
                    candidate_name: candidate_name.clone(),
                    source_path: path.clone(),
                });
            }
            debug!(
                candidate = %candidate_name,
                path = %path.display(),
                chunk_count = chunks.len() - before,
                "ingested CV"
            );
            documents.push(CandidateDocument {
                source_path: path.clone(),
                candidate_name,
            });
        }

        // 3. Embed the whole chunk set into the index
        let index = RelevanceIndex::build(chunks, embeddings).await?;

        info!(candidates = documents.len(), chunks = index.len(), "CV batch indexed");
        Ok(CvMatcher { config, generator, index, documents })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(candidate: &str, text: &str) -> Chunk {
        Chunk {
            text: text.to_string(),
            candidate_name: candidate.to_string(),
            source_path: PathBuf::from(format!("{candidate}.pdf")),
        }
    }

    #[test]
    fn evidence_groups_by_candidate_in_first_retrieved_order() {
        let retrieved = [
            chunk("Alice Stone", "python services"),
            chunk("Bora Kim", "java tooling"),
            chunk("Alice Stone", "python pipelines"),
        ];
        let (evidence, _) = group_evidence(&retrieved);
        assert_eq!(evidence.len(), 2);
        assert_eq!(evidence[0].candidate_name, "Alice Stone");
        assert_eq!(
            evidence[0].excerpts,
            vec!["python services".to_string(), "python pipelines".to_string()]
        );
        assert_eq!(evidence[1].candidate_name, "Bora Kim");
    }

    #[test]
    fn ranking_sorts_by_match_count_with_stable_ties() {
        let retrieved = [
            chunk("Alice Stone", "a"),
            chunk("Bora Kim", "b"),
            chunk("Chen Wei", "c"),
            chunk("Bora Kim", "d"),
        ];
        let (_, ranking) = group_evidence(&retrieved);
        let pairs: Vec<(&str, usize)> =
            ranking.iter().map(|r| (r.candidate_name.as_str(), r.matches)).collect();
        // Alice and Chen both have one match; Alice was retrieved first.
        assert_eq!(pairs, vec![("Bora Kim", 2), ("Alice Stone", 1), ("Chen Wei", 1)]);
    }

    #[test]
    fn empty_retrieval_groups_to_nothing() {
        let (evidence, ranking) = group_evidence(&[]);
        assert!(evidence.is_empty());
        assert!(ranking.is_empty());
    }
}
