//! Narrative generation seam.
//!
//! The matcher hands a fully rendered prompt to an [`AnalysisGenerator`] and
//! gets raw model text back. The prompt asks the model to open with a
//! self-classification marker; [`Narrative::from_generated`] folds that
//! convention into a typed value exactly once, so nothing downstream ever
//! scans for markers again.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::prompts::{CV_ANALYSIS_MARKER, GENERAL_QUESTION_MARKER};

/// A backend that turns a rendered prompt into narrative text.
#[async_trait]
pub trait AnalysisGenerator: Send + Sync {
    /// Generate narrative text for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Generated narrative, classified by the marker the model opened with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Narrative {
    /// The model answered a question about the assistant itself; no
    /// candidate evidence backs this text.
    General(String),
    /// A candidate analysis grounded in retrieved CV excerpts.
    Analysis(String),
}

impl Narrative {
    /// Classify raw model output and strip the markers from the display text.
    ///
    /// Output carrying the general-question marker becomes
    /// [`Narrative::General`]; anything else, marked or not, is treated as
    /// analysis. Models drop markers often enough that unmarked text must
    /// stay usable.
    pub fn from_generated(raw: &str) -> Self {
        if raw.contains(GENERAL_QUESTION_MARKER) {
            Narrative::General(strip_markers(raw))
        } else {
            Narrative::Analysis(strip_markers(raw))
        }
    }

    /// The display text, whichever kind this is.
    pub fn text(&self) -> &str {
        match self {
            Narrative::General(text) | Narrative::Analysis(text) => text,
        }
    }

    /// `true` when no candidate evidence backs this narrative.
    pub fn is_general(&self) -> bool {
        matches!(self, Narrative::General(_))
    }
}

/// Remove the classification markers, bold-wrapped or bare, and trim.
fn strip_markers(raw: &str) -> String {
    let bold_general = format!("**{GENERAL_QUESTION_MARKER}**");
    let bold_analysis = format!("**{CV_ANALYSIS_MARKER}**");
    raw.replace(&bold_general, "")
        .replace(&bold_analysis, "")
        .replace(GENERAL_QUESTION_MARKER, "")
        .replace(CV_ANALYSIS_MARKER, "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_marker_classifies_as_general() {
        let narrative = Narrative::from_generated(
            "[GENERAL_QUESTION]\n\nI compare the CVs you upload against your questions.",
        );
        assert!(narrative.is_general());
        assert_eq!(narrative.text(), "I compare the CVs you upload against your questions.");
    }

    #[test]
    fn analysis_marker_classifies_as_analysis() {
        let narrative =
            Narrative::from_generated("[CV_ANALYSIS]\n\nJohn Smith has ten years of Python.");
        assert_eq!(
            narrative,
            Narrative::Analysis("John Smith has ten years of Python.".to_string())
        );
    }

    #[test]
    fn unmarked_output_defaults_to_analysis() {
        let narrative = Narrative::from_generated("Both candidates list Kubernetes.");
        assert_eq!(narrative, Narrative::Analysis("Both candidates list Kubernetes.".to_string()));
    }

    #[test]
    fn bold_wrapped_markers_are_stripped_cleanly() {
        let narrative = Narrative::from_generated("**[CV_ANALYSIS]**\n\nMaria leads the ranking.");
        assert_eq!(narrative.text(), "Maria leads the ranking.");
        assert!(!narrative.text().contains("**"));
    }

    #[test]
    fn empty_output_stays_empty_analysis() {
        let narrative = Narrative::from_generated("");
        assert_eq!(narrative, Narrative::Analysis(String::new()));
    }
}
