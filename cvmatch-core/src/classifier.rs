//! Rule-based query gating.
//!
//! Screening queries are answered with LLM output grounded in CV excerpts,
//! which makes off-topic and adversarial questions worth rejecting before any
//! retrieval happens. The gate is a fixed sequence of cheap checks; the first
//! one that fires decides the verdict.

use std::sync::LazyLock;

use regex::RegexSet;

/// Questions shorter than this (after trimming) carry no intent.
const MIN_QUESTION_CHARS: usize = 3;
/// Questions of at most this many words must be anchored to hiring
/// vocabulary to pass.
const MAX_UNGROUNDED_WORDS: usize = 5;

/// Subjects a screening assistant has no business discussing. Matched by
/// plain substring against the lower-cased question.
const OFF_TOPIC_KEYWORDS: [&str; 49] = [
    "joke", "funny", "laugh", "humor", "humour", "cook", "recipe", "food", "dish", "meal",
    "restaurant", "weather", "temperature", "forecast", "movie", "film", "show", "series",
    "netflix", "game", "gaming", "play", "song", "music", "singer", "band", "sport", "football",
    "basketball", "soccer", "love", "dating", "relationship", "marry", "story", "tale",
    "narrative", "riddle", "puzzle", "poem", "poetry", "color", "colour", "favorite", "favourite",
    "animal", "pet", "dog", "cat",
];

/// Hiring vocabulary that grounds a short question. Matched by substring.
const CV_TERMS: [&str; 37] = [
    "candidate", "cv", "resume", "skill", "experience", "qualification", "job", "position",
    "role", "work", "project", "education", "degree", "certification", "training", "language",
    "technical", "programming", "developer", "engineer", "manager", "analyst", "design",
    "development", "team", "leadership", "professional", "employment", "background", "expertise",
    "knowledge", "proficient", "years", "senior", "junior", "expert", "familiar",
];

/// Short questions about the assistant itself that are allowed through.
const GENERAL_QUESTION_PHRASES: [&str; 4] =
    ["who are you", "what do you do", "what is your", "how can you help"];

static INJECTION_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"ignore\s+(all\s+)?(previous|prior|above)",
        r"disregard\s+(all\s+)?(previous|prior|instructions)",
        r"forget\s+(all\s+)?(previous|prior|instructions)",
        r"new\s+instructions?",
        r"system\s+(prompt|message|instruction)",
        r"act\s+as\s+(if|a|an)",
        r"pretend\s+(to\s+be|you\s+are)",
        r"you\s+are\s+now",
        r"from\s+now\s+on",
        r"override",
        r"bypass",
    ])
    .expect("static injection patterns must compile")
});

/// Outcome of gating one question. Everything except [`Relevant`] is a
/// rejection, and the variant records which check fired.
///
/// [`Relevant`]: QuestionVerdict::Relevant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionVerdict {
    /// Worth answering with CV evidence.
    Relevant,
    /// Empty or too short to carry intent.
    TooShort,
    /// Matched a prompt-injection pattern.
    Injection,
    /// Mentioned an off-topic subject.
    OffTopic,
    /// Short and anchored to no hiring vocabulary.
    Ungrounded,
}

impl QuestionVerdict {
    /// `true` only for [`QuestionVerdict::Relevant`].
    pub fn is_relevant(self) -> bool {
        matches!(self, Self::Relevant)
    }
}

/// Gate a question before retrieval.
///
/// The checks run in a fixed order: length, injection patterns, off-topic
/// keywords, then the grounding rule for short questions. The order is part
/// of the contract; injection attempts phrased as short commands must be
/// reported as injections, not merely as ungrounded chatter.
pub fn classify_question(question: &str) -> QuestionVerdict {
    if question.trim().chars().count() < MIN_QUESTION_CHARS {
        return QuestionVerdict::TooShort;
    }
    let lower = question.to_lowercase();
    if INJECTION_PATTERNS.is_match(&lower) {
        return QuestionVerdict::Injection;
    }
    if OFF_TOPIC_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return QuestionVerdict::OffTopic;
    }
    let word_count = question.split_whitespace().count();
    if word_count <= MAX_UNGROUNDED_WORDS
        && !CV_TERMS.iter().any(|term| lower.contains(term))
        && !GENERAL_QUESTION_PHRASES.iter().any(|phrase| lower.contains(phrase))
    {
        return QuestionVerdict::Ungrounded;
    }
    QuestionVerdict::Relevant
}

/// Convenience wrapper for callers that only need the yes/no answer.
pub fn is_question_irrelevant(question: &str) -> bool {
    !classify_question(question).is_relevant()
}
