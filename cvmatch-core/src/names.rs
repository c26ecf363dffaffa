//! Candidate name extraction from CV text.
//!
//! CVs usually open with the candidate's name, so the extractor scans the
//! first few lines for something name-shaped and falls back to the file name
//! when nothing qualifies. It never fails: the worst case is a generic
//! placeholder.

use std::path::Path;

/// How much of the document head is scanned, in characters.
const SCAN_CHARS: usize = 500;
/// How many lines of the head are examined.
const SCAN_LINES: usize = 5;
/// Accepted word length range for a name word, in characters.
const NAME_WORD_CHARS: std::ops::RangeInclusive<usize> = 2..=15;
/// Longest accepted name line, in words.
const MAX_NAME_WORDS: usize = 4;
/// Returned when neither the text nor the file name yields anything usable.
const UNKNOWN_CANDIDATE: &str = "Unknown Candidate";

/// Characters that mark a line as contact details or layout, not a name.
const CONTACT_CHARS: [char; 4] = ['@', ':', '|', '/'];
/// UTF-8 bullet read through a Latin-1 decode, common in scraped PDF text.
const GARBLED_BULLET: &str = "â€¢";

/// Section headings that often appear early in a CV and must never be
/// mistaken for a name. Compared case-insensitively, by substring.
const SECTION_HEADERS: [&str; 36] = [
    "professional summary",
    "work experience",
    "education",
    "skills",
    "technical skills",
    "certifications",
    "projects",
    "experience",
    "professional experience",
    "career objective",
    "objective",
    "qualifications",
    "summary",
    "contact",
    "contact information",
    "personal information",
    "languages",
    "interests",
    "hobbies",
    "references",
    "awards",
    "achievements",
    "publications",
    "volunteer experience",
    "core competencies",
    "expertise",
    "profile",
    "career summary",
    "about me",
    "personal details",
    "employment history",
    "work history",
    "academic background",
    "professional certifications",
    "training",
    "licenses",
];

/// Filler words dropped when deriving a name from a file name.
const FILLER_WORDS: [&str; 5] = ["cv", "resume", "curriculum", "vitae", "sample"];

/// Pull a candidate name out of CV text, falling back to the file name.
///
/// Scans the first [`SCAN_LINES`] lines of the first [`SCAN_CHARS`] characters
/// for a plausible name line and returns its first two words. When no line
/// qualifies, derives a name from `file_name` instead. Always returns a
/// non-empty string.
pub fn extract_candidate_name(text: &str, file_name: &str) -> String {
    let head: String = text.chars().take(SCAN_CHARS).collect();
    for line in head.lines().take(SCAN_LINES) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        if !(2..=MAX_NAME_WORDS).contains(&words.len()) {
            continue;
        }
        if !words.iter().all(|w| starts_uppercase(w)) {
            continue;
        }
        if CONTACT_CHARS.iter().any(|c| line.contains(*c)) || line.contains(GARBLED_BULLET) {
            continue;
        }
        if !is_plausible_name(line, &words) {
            continue;
        }
        return words[..2].join(" ");
    }
    name_from_file(file_name)
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Validation layered on top of the shape checks: section headings, shouting
/// header lines and words of implausible length all disqualify a line.
fn is_plausible_name(line: &str, words: &[&str]) -> bool {
    let lower = line.to_lowercase();
    if SECTION_HEADERS.iter().any(|header| lower.contains(header)) {
        return false;
    }
    if is_all_uppercase(line) && words.len() > 2 {
        return false;
    }
    if words.len() > MAX_NAME_WORDS {
        return false;
    }
    words.iter().all(|w| NAME_WORD_CHARS.contains(&w.chars().count()))
}

/// True when the line has at least one cased character and none of them are
/// lowercase.
fn is_all_uppercase(line: &str) -> bool {
    let mut has_cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Derive a display name from a file name: strip the extension, split on
/// `_`/`-`, drop filler words (reverting if that empties the list), keep the
/// first two words and capitalize them.
fn name_from_file(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let spaced = stem.replace(['_', '-'], " ");
    let words: Vec<&str> = spaced.split_whitespace().collect();
    let kept: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| !FILLER_WORDS.contains(&w.to_lowercase().as_str()))
        .collect();
    let pick: &[&str] = if kept.is_empty() { &words } else { &kept };

    let name = pick.iter().take(2).map(|w| capitalize(w)).collect::<Vec<_>>().join(" ");
    if !name.is_empty() {
        return name;
    }
    let titled = spaced.split_whitespace().map(capitalize).collect::<Vec<_>>().join(" ");
    if !titled.is_empty() {
        return titled;
    }
    UNKNOWN_CANDIDATE.to_string()
}

/// Uppercase the first character, lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_on_the_first_line_is_found() {
        let text = "John Smith\nSoftware Engineer\njohn@example.com";
        assert_eq!(extract_candidate_name(text, "whatever.pdf"), "John Smith");
    }

    #[test]
    fn only_the_first_two_words_are_kept() {
        let text = "John Michael Smith\nBackend Developer";
        assert_eq!(extract_candidate_name(text, "x.pdf"), "John Michael");
    }

    #[test]
    fn section_headings_are_passed_over() {
        let text = "Professional Summary\nJane Doe\nData Engineer";
        assert_eq!(extract_candidate_name(text, "x.pdf"), "Jane Doe");
    }

    #[test]
    fn shouting_header_lines_are_passed_over() {
        let text = "SENIOR BACKEND ENGINEER ROLE\nMaria Garcia\n";
        assert_eq!(extract_candidate_name(text, "x.pdf"), "Maria Garcia");
    }

    #[test]
    fn contact_lines_are_passed_over() {
        // Both words pass the shape checks; the slash marks it as contact data.
        let text = "Jane Doe/Smith\nJane Doe\n";
        assert_eq!(extract_candidate_name(text, "x.pdf"), "Jane Doe");
    }

    #[test]
    fn garbled_bullet_lines_are_passed_over() {
        let text = "Johnâ€¢ Doe\nJane Roe\n";
        assert_eq!(extract_candidate_name(text, "x.pdf"), "Jane Roe");
    }

    #[test]
    fn lines_with_implausible_word_lengths_are_passed_over() {
        // "J" is below the two-character minimum.
        let text = "J Smith\nAlice Jones\n";
        assert_eq!(extract_candidate_name(text, "x.pdf"), "Alice Jones");
    }

    #[test]
    fn file_name_fallback_strips_filler_words() {
        let text = "experienced in many things\n12345\n";
        assert_eq!(extract_candidate_name(text, "john_doe_resume.pdf"), "John Doe");
    }

    #[test]
    fn file_name_fallback_normalizes_case() {
        assert_eq!(extract_candidate_name("", "JOHN-DOE.pdf"), "John Doe");
    }

    #[test]
    fn all_filler_file_name_reverts_to_unfiltered_words() {
        assert_eq!(extract_candidate_name("", "cv_resume.pdf"), "Cv Resume");
    }

    #[test]
    fn nothing_usable_yields_the_placeholder() {
        assert_eq!(extract_candidate_name("", ""), "Unknown Candidate");
    }

    #[test]
    fn lines_beyond_the_scan_window_are_ignored() {
        let text = "1\n2\n3\n4\n5\nJohn Smith\n";
        assert_eq!(extract_candidate_name(text, "acme_profile.pdf"), "Acme Profile");
    }
}
