//! Property tests for recursive chunking.

use cvmatch_core::RecursiveChunker;
use proptest::prelude::*;

/// Text assembled from unique numbered tokens grouped into paragraphs, so
/// coverage and ordering stay checkable without ambiguity.
fn arb_token_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(1usize..12, 1..8).prop_map(|paragraph_sizes| {
        let mut next = 0usize;
        let paragraphs: Vec<String> = paragraph_sizes
            .iter()
            .map(|&size| {
                let words: Vec<String> = (0..size)
                    .map(|_| {
                        let word = format!("w{next}");
                        next += 1;
                        word
                    })
                    .collect();
                words.join(" ")
            })
            .collect();
        paragraphs.join("\n\n")
    })
}

/// Any chunker geometry with the overlap strictly below the size.
fn arb_geometry() -> impl Strategy<Value = (usize, usize)> {
    (2usize..30).prop_flat_map(|size| (Just(size), 0..size))
}

/// Geometry where every word atom of [`arb_token_text`] fits in a chunk, so
/// no token is ever cut mid-word.
fn arb_word_geometry() -> impl Strategy<Value = (usize, usize)> {
    (8usize..64).prop_flat_map(|size| (Just(size), 0usize..8))
}

/// **Property: chunk size bound**
/// *For any* input text and geometry, every produced chunk SHALL be
/// non-empty and at most `chunk_size` characters long.
mod prop_size_bound {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn chunks_are_nonempty_and_within_the_limit(
            text in arb_token_text(),
            (chunk_size, chunk_overlap) in arb_geometry(),
        ) {
            let chunks = RecursiveChunker::new(chunk_size, chunk_overlap).split(&text);
            prop_assert!(!chunks.is_empty());
            for chunk in &chunks {
                prop_assert!(!chunk.is_empty());
                prop_assert!(
                    chunk.chars().count() <= chunk_size,
                    "chunk of {} chars exceeds the {} limit: {:?}",
                    chunk.chars().count(),
                    chunk_size,
                    chunk,
                );
            }
        }
    }
}

/// **Property: zero-overlap reconstruction**
/// *For any* input text, chunks produced with zero overlap SHALL
/// concatenate back to the input exactly.
mod prop_zero_overlap_reconstruction {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn concatenation_reproduces_the_input(
            text in arb_token_text(),
            chunk_size in 2usize..40,
        ) {
            let chunks = RecursiveChunker::new(chunk_size, 0).split(&text);
            prop_assert_eq!(chunks.concat(), text);
        }
    }
}

/// **Property: verbatim slices**
/// *For any* input text and geometry, every chunk SHALL appear verbatim in
/// the input; chunking never invents or reorders characters.
mod prop_verbatim_slices {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn every_chunk_is_a_slice_of_the_input(
            text in arb_token_text(),
            (chunk_size, chunk_overlap) in arb_geometry(),
        ) {
            for chunk in RecursiveChunker::new(chunk_size, chunk_overlap).split(&text) {
                prop_assert!(
                    text.contains(chunk.as_str()),
                    "chunk {:?} is not a slice of the input",
                    chunk,
                );
            }
        }
    }
}

/// **Property: token coverage and order**
/// *For any* token text and word-sized geometry, the tokens inside one chunk
/// SHALL be consecutive, chunk start positions SHALL be non-decreasing, and
/// every input token SHALL appear in at least one chunk.
mod prop_token_coverage {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn chunks_cover_every_token_in_order(
            text in arb_token_text(),
            (chunk_size, chunk_overlap) in arb_word_geometry(),
        ) {
            let total = text.split_whitespace().count();
            let chunks = RecursiveChunker::new(chunk_size, chunk_overlap).split(&text);

            let mut seen = vec![false; total];
            let mut previous_start = 0usize;
            for chunk in &chunks {
                let indices: Vec<usize> = chunk
                    .split_whitespace()
                    .map(|token| token.strip_prefix('w').unwrap().parse::<usize>().unwrap())
                    .collect();
                if indices.is_empty() {
                    continue;
                }
                for pair in indices.windows(2) {
                    prop_assert_eq!(pair[1], pair[0] + 1, "tokens inside a chunk must be consecutive");
                }
                prop_assert!(
                    indices[0] >= previous_start,
                    "chunk starting at token {} begins before the previous chunk's start {}",
                    indices[0],
                    previous_start,
                );
                previous_start = indices[0];
                for index in indices {
                    seen[index] = true;
                }
            }
            prop_assert!(seen.iter().all(|&covered| covered), "some input token was dropped");
        }
    }
}

/// **Property: stride cutting**
/// *For any* run of text with no separator at all, every piece except the
/// last SHALL be exactly `chunk_size` characters, adjacent pieces SHALL
/// share exactly `chunk_overlap` characters, and the fresh characters SHALL
/// add back up to the input length.
mod prop_stride_regime {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn separator_free_runs_are_cut_by_exact_stride(
            text in "[0-9]{1,120}",
            (chunk_size, chunk_overlap) in arb_geometry(),
        ) {
            let total = text.chars().count();
            let chunks = RecursiveChunker::new(chunk_size, chunk_overlap).split(&text);

            if total <= chunk_size {
                prop_assert_eq!(chunks, vec![text.clone()]);
                return Ok(());
            }

            let first: String = text.chars().take(chunk_size).collect();
            prop_assert_eq!(&chunks[0], &first);
            for chunk in &chunks[..chunks.len() - 1] {
                prop_assert_eq!(chunk.chars().count(), chunk_size);
            }
            for pair in chunks.windows(2) {
                let overlap_from_a: String = {
                    let chars: Vec<char> = pair[0].chars().collect();
                    chars[chars.len() - chunk_overlap..].iter().collect()
                };
                prop_assert!(
                    pair[1].starts_with(&overlap_from_a),
                    "piece {:?} does not continue the previous piece's tail {:?}",
                    pair[1],
                    overlap_from_a,
                );
            }
            let char_sum: usize = chunks.iter().map(|c| c.chars().count()).sum();
            prop_assert_eq!(char_sum - (chunks.len() - 1) * chunk_overlap, total);
        }
    }
}
