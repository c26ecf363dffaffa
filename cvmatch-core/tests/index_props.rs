//! Property tests for relevance index search ordering.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use cvmatch_core::{Chunk, EmbeddingProvider, MatchError, RelevanceIndex};
use proptest::prelude::*;

const DIM: usize = 16;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Embedder that serves vectors from a fixed text-keyed table.
struct TableEmbeddings {
    table: HashMap<String, Vec<f32>>,
}

#[async_trait]
impl EmbeddingProvider for TableEmbeddings {
    async fn embed(&self, text: &str) -> cvmatch_core::Result<Vec<f32>> {
        self.table.get(text).cloned().ok_or_else(|| MatchError::Embedding {
            provider: "table".into(),
            message: format!("no embedding scripted for {text:?}"),
        })
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

fn test_chunk(text: &str, i: usize) -> Chunk {
    Chunk {
        text: text.to_string(),
        candidate_name: format!("Candidate {}", i % 3),
        source_path: PathBuf::from("cv.pdf"),
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// **Property: search ordering**
/// *For any* chunk set and query embedding, querying SHALL return exactly
/// `min(k, stored)` chunks ordered by descending cosine similarity, and
/// repeating the query SHALL return the identical result.
mod prop_search_ordering {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_by_descending_similarity(
            embeddings in proptest::collection::vec(arb_normalized_embedding(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            k in 1usize..25,
        ) {
            let mut table = HashMap::new();
            let mut chunks = Vec::new();
            for (i, embedding) in embeddings.iter().enumerate() {
                let text = format!("chunk {i}");
                table.insert(text.clone(), embedding.clone());
                chunks.push(test_chunk(&text, i));
            }
            table.insert("query".to_string(), query.clone());
            let lookup = table.clone();
            let stored = chunks.len();

            let rt = tokio::runtime::Runtime::new().unwrap();
            let (first, second) = rt.block_on(async {
                let index = RelevanceIndex::build(chunks, Arc::new(TableEmbeddings { table }))
                    .await
                    .unwrap();
                let first = index.query("query", k).await.unwrap();
                let second = index.query("query", k).await.unwrap();
                (first, second)
            });

            prop_assert_eq!(first.len(), k.min(stored));

            for pair in first.windows(2) {
                let score_a = cosine(&lookup[&pair[0].text], &query);
                let score_b = cosine(&lookup[&pair[1].text], &query);
                prop_assert!(
                    score_a >= score_b,
                    "results not in descending order: {} < {}",
                    score_a,
                    score_b,
                );
            }

            prop_assert_eq!(first, second);
        }
    }
}

/// **Property: tie stability**
/// *For any* chunk set sharing a single embedding, a query SHALL return the
/// first `min(k, stored)` chunks in ingestion order.
mod prop_tie_stability {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn equal_scores_keep_ingestion_order(
            embedding in arb_normalized_embedding(DIM),
            query in arb_normalized_embedding(DIM),
            count in 2usize..12,
            k in 1usize..15,
        ) {
            let mut table = HashMap::new();
            let mut chunks = Vec::new();
            for i in 0..count {
                let text = format!("chunk {i}");
                table.insert(text.clone(), embedding.clone());
                chunks.push(test_chunk(&text, i));
            }
            table.insert("query".to_string(), query);
            let expected: Vec<String> =
                chunks.iter().take(k.min(count)).map(|c| c.text.clone()).collect();

            let rt = tokio::runtime::Runtime::new().unwrap();
            let results = rt.block_on(async {
                let index = RelevanceIndex::build(chunks, Arc::new(TableEmbeddings { table }))
                    .await
                    .unwrap();
                index.query("query", k).await.unwrap()
            });

            let texts: Vec<String> = results.into_iter().map(|c| c.text).collect();
            prop_assert_eq!(texts, expected);
        }
    }
}

#[tokio::test]
async fn empty_batches_cannot_build_an_index() {
    let embedder = Arc::new(TableEmbeddings { table: HashMap::new() });
    let err = RelevanceIndex::build(Vec::new(), embedder).await.unwrap_err();
    assert!(matches!(err, MatchError::IndexBuild(_)));
}

#[tokio::test]
async fn unembeddable_queries_are_retrieval_errors() {
    let mut table = HashMap::new();
    table.insert("chunk 0".to_string(), vec![1.0; DIM]);
    let index =
        RelevanceIndex::build(vec![test_chunk("chunk 0", 0)], Arc::new(TableEmbeddings { table }))
            .await
            .unwrap();

    let err = index.query("never scripted", 5).await.unwrap_err();
    assert!(matches!(err, MatchError::Retrieval(_)));
}
