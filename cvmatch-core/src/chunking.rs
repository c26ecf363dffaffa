//! Recursive text chunking for CV content.
//!
//! CVs arrive as one extracted string per file. [`RecursiveChunker`] cuts that
//! string into retrieval-sized pieces, breaking at the coarsest boundary that
//! still fits: paragraphs first, then lines, sentences, words, and only as a
//! last resort mid-word.

/// Boundary hierarchy, coarsest first. Separators stay attached to the text
/// before them so no characters are lost.
const SEPARATORS: [&str; 6] = ["\n\n", "\n", ". ", "! ", "? ", " "];

/// Splits text hierarchically: paragraphs, then lines, sentences, and words.
///
/// Consecutive chunks share a trailing slice of the previous chunk so that
/// content near a cut stays queryable from both sides. At natural boundaries
/// the carried text is made of whole segments totalling at most
/// `chunk_overlap` characters; when a run has no boundary at all, chunks are
/// cut by a fixed stride and the shared slice is exactly `chunk_overlap`
/// characters. All sizes are in characters, so multi-byte text never gets cut
/// inside a code point.
///
/// # Example
///
/// ```rust,ignore
/// use cvmatch_core::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(600, 100);
/// let chunks = chunker.split(&cv_text);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - maximum number of characters per chunk
    /// * `chunk_overlap` - characters shared between consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }

    /// Split `text` into chunks of at most `chunk_size` characters.
    ///
    /// Returns an empty `Vec` for empty input; every returned chunk is
    /// non-empty. Dropping the shared prefix of each chunk after the first
    /// reassembles the input exactly.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut atoms = Vec::new();
        collect_atoms(text, self.chunk_size, &SEPARATORS, &mut atoms);

        let mut chunks: Vec<String> = Vec::new();
        // Segments pending for the chunk under assembly. When `fresh` is less
        // than `window.len()`, the leading entries repeat the tail of the
        // previous chunk.
        let mut window: Vec<String> = Vec::new();
        let mut window_chars = 0usize;
        let mut fresh = 0usize;

        for atom in atoms {
            let atom_chars = count_chars(&atom);

            if atom_chars > self.chunk_size {
                // No boundary fits inside this run. Emit what is pending,
                // then cut by stride.
                if fresh > 0 {
                    chunks.push(window.concat());
                }
                window.clear();
                window_chars = 0;
                fresh = 0;
                split_by_stride(&atom, self.chunk_size, self.chunk_overlap, &mut chunks);
                if let Some(previous) = chunks.last() {
                    let tail = tail_chars(previous, self.chunk_overlap);
                    if !tail.is_empty() {
                        window_chars = count_chars(&tail);
                        window.push(tail);
                    }
                }
                continue;
            }

            while window_chars + atom_chars > self.chunk_size {
                if fresh > 0 {
                    chunks.push(window.concat());
                    window = carried_tail(&window, self.chunk_overlap);
                    window_chars = window.iter().map(|a| count_chars(a)).sum();
                    fresh = 0;
                } else {
                    // Carried text alone leaves no room for the new segment;
                    // shed it from the front.
                    window_chars -= count_chars(&window[0]);
                    window.remove(0);
                }
            }

            window_chars += atom_chars;
            window.push(atom);
            fresh += 1;
        }

        if fresh > 0 {
            chunks.push(window.concat());
        }

        chunks
    }
}

/// Break `text` into segments of at most `chunk_size` characters, descending
/// the separator hierarchy only where a segment is still too large. Segments
/// longer than `chunk_size` are emitted as-is when no separator is left; the
/// assembler stride-cuts those.
fn collect_atoms(text: &str, chunk_size: usize, separators: &[&str], out: &mut Vec<String>) {
    if text.is_empty() {
        return;
    }
    if count_chars(text) <= chunk_size {
        out.push(text.to_string());
        return;
    }
    let Some((separator, deeper)) = separators.split_first() else {
        out.push(text.to_string());
        return;
    };

    let segments = split_keeping_separator(text, separator);
    if segments.len() == 1 {
        // Separator absent (or only trailing); try the next level.
        collect_atoms(text, chunk_size, deeper, out);
        return;
    }
    for segment in segments {
        if count_chars(segment) <= chunk_size {
            out.push(segment.to_string());
        } else {
            collect_atoms(segment, chunk_size, deeper, out);
        }
    }
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Fixed-stride character cutting for runs without any usable boundary.
/// Consecutive pieces share exactly `chunk_overlap` characters, except that
/// the final piece just runs to the end.
fn split_by_stride(text: &str, chunk_size: usize, chunk_overlap: usize, out: &mut Vec<String>) {
    let chars: Vec<char> = text.chars().collect();
    let stride = chunk_size.saturating_sub(chunk_overlap).max(1);
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        out.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += stride;
    }
}

/// Whole trailing segments of `window` totalling at most `chunk_overlap`
/// characters. A segment is carried entirely or not at all.
fn carried_tail(window: &[String], chunk_overlap: usize) -> Vec<String> {
    let mut keep = 0usize;
    let mut total = 0usize;
    for atom in window.iter().rev() {
        let len = count_chars(atom);
        if total + len > chunk_overlap {
            break;
        }
        total += len;
        keep += 1;
    }
    window[window.len() - keep..].to_vec()
}

/// Last `count` characters of `text`, or all of it if shorter.
fn tail_chars(text: &str, count: usize) -> String {
    if count == 0 {
        return String::new();
    }
    let total = text.chars().count();
    text.chars().skip(total.saturating_sub(count)).collect()
}

fn count_chars(s: &str) -> usize {
    s.chars().count()
}
