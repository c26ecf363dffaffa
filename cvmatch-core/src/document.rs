//! Data types for CVs, chunks, and match reports.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::generation::Narrative;

/// A staged CV that has been ingested into a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateDocument {
    /// Path the CV was read from.
    pub source_path: PathBuf,
    /// Candidate name pulled from the CV text, or derived from the file name.
    pub candidate_name: String,
}

/// A segment of one CV's extracted text.
///
/// The text is never empty and every chunk stays attributable to the
/// candidate it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// Name of the candidate whose CV produced this chunk.
    pub candidate_name: String,
    /// Path of the CV file this chunk came from.
    pub source_path: PathBuf,
}

/// Retrieved excerpts for one candidate, grouped out of a query's results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateEvidence {
    /// The candidate these excerpts belong to.
    pub candidate_name: String,
    /// Retrieved chunk texts, in retrieval order (most relevant first).
    pub excerpts: Vec<String>,
}

/// One row of the per-query ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedCandidate {
    /// The ranked candidate.
    pub candidate_name: String,
    /// How many of the retrieved chunks came from this candidate.
    pub matches: usize,
}

/// The full answer to one screening query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// The generated narrative, already classified.
    pub narrative: Narrative,
    /// Retrieved excerpts grouped per candidate, in first-retrieved order.
    pub evidence: Vec<CandidateEvidence>,
    /// Candidates ordered by how much of the retrieved evidence was theirs.
    /// Ties keep first-retrieved order.
    pub ranking: Vec<RankedCandidate>,
    /// Names of every candidate in the batch, in ingestion order.
    pub candidates: Vec<String>,
}

impl MatchReport {
    /// Returns the retrieved excerpts for `candidate`, if any chunk of theirs
    /// was retrieved for this query.
    pub fn evidence_for(&self, candidate: &str) -> Option<&[String]> {
        self.evidence
            .iter()
            .find(|e| e.candidate_name == candidate)
            .map(|e| e.excerpts.as_slice())
    }
}
