//! In-memory relevance index over embedded CV chunks.
//!
//! The index is built once per CV batch and never mutated afterwards: a new
//! batch means a new index. Keeping it immutable makes the "all chunks belong
//! to the current batch" invariant hold by construction.

use std::sync::Arc;

use tracing::{debug, info};

use crate::document::Chunk;
use crate::embedding::EmbeddingProvider;
use crate::error::{MatchError, Result};

/// A chunk paired with its embedding.
#[derive(Debug, Clone)]
struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// Immutable cosine-similarity index over one CV batch.
///
/// # Example
///
/// ```rust,ignore
/// use cvmatch_core::RelevanceIndex;
///
/// let index = RelevanceIndex::build(chunks, embedder).await?;
/// let hits = index.query("kubernetes experience", 15).await?;
/// ```
pub struct RelevanceIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    entries: Vec<IndexEntry>,
}

impl std::fmt::Debug for RelevanceIndex {
    // Manual impl: `Arc<dyn EmbeddingProvider>` is not `Debug`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelevanceIndex")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl RelevanceIndex {
    /// Embed every chunk and build the index.
    ///
    /// The whole batch is embedded in one call; any failure fails the build,
    /// so a constructed index always covers every chunk it was given.
    pub async fn build(
        chunks: Vec<Chunk>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        if chunks.is_empty() {
            return Err(MatchError::IndexBuild(
                "the CV batch produced no text chunks".to_string(),
            ));
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| MatchError::IndexBuild(format!("embedding the chunk batch failed: {e}")))?;
        if embeddings.len() != chunks.len() {
            return Err(MatchError::IndexBuild(format!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry { chunk, embedding })
            .collect();
        info!(chunk_count = entries.len(), "relevance index built");
        Ok(Self { embedder, entries })
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the index holds no chunks. Unreachable through
    /// [`build`](RelevanceIndex::build), which rejects empty batches.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the `k` chunks most similar to `text`, best first.
    ///
    /// Ordering is deterministic: descending cosine similarity, with ties
    /// keeping ingestion order.
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<Chunk>> {
        let query_embedding = self
            .embedder
            .embed(text)
            .await
            .map_err(|e| MatchError::Retrieval(format!("embedding the query failed: {e}")))?;

        let mut scored: Vec<(f32, &Chunk)> = self
            .entries
            .iter()
            .map(|entry| (cosine_similarity(&entry.embedding, &query_embedding), &entry.chunk))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        debug!(k, returned = scored.len(), "index queried");
        Ok(scored.into_iter().map(|(_, chunk)| chunk.clone()).collect())
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
