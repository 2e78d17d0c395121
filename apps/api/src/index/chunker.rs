//! Recursive-character text splitting for the chunked evidence index.
//!
//! Chunks are measured in characters. Each chunk is at most `chunk_size`
//! characters and consecutive chunks share roughly `overlap` characters so
//! evidence straddling a boundary is retrievable from either side. Breaks
//! prefer paragraph, then line, then sentence, then word boundaries.

/// Splits `text` into overlapping chunks. Whitespace-only input yields no
/// chunks. `overlap` must be smaller than `chunk_size`.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    debug_assert!(overlap < chunk_size);

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total {
        let hard_end = (start + chunk_size).min(total);
        let end = if hard_end < total {
            start + best_break(&chars[start..hard_end])
        } else {
            hard_end
        };

        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if end >= total {
            break;
        }

        // Step back for overlap, but always make forward progress.
        let next = end.saturating_sub(overlap);
        start = if next > start { next } else { end };
    }

    chunks
}

/// Finds the best break offset within a full-size window, searching backwards
/// through boundary classes. Falls back to the hard window end when the
/// window contains no boundary at all (one unbroken token).
fn best_break(window: &[char]) -> usize {
    let len = window.len();
    // Only consider breaks in the back half of the window so chunks stay
    // reasonably full.
    let floor = len / 2;

    let boundaries: [fn(&[char], usize) -> bool; 3] =
        [is_paragraph_break, is_line_break, is_sentence_break];
    for boundary in boundaries {
        for i in (floor..len).rev() {
            if boundary(window, i) {
                return i + 1;
            }
        }
    }
    for i in (floor..len).rev() {
        if window[i] == ' ' {
            return i + 1;
        }
    }
    len
}

fn is_paragraph_break(window: &[char], i: usize) -> bool {
    window[i] == '\n' && i > 0 && window[i - 1] == '\n'
}

fn is_line_break(window: &[char], i: usize) -> bool {
    window[i] == '\n'
}

fn is_sentence_break(window: &[char], i: usize) -> bool {
    window[i] == ' ' && i > 0 && matches!(window[i - 1], '.' | '!' | '?')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = split_text("A short resume.", 1000, 200);
        assert_eq!(chunks, vec!["A short resume.".to_string()]);
    }

    #[test]
    fn test_whitespace_only_yields_no_chunks() {
        assert!(split_text("   \n\n  ", 1000, 200).is_empty());
    }

    #[test]
    fn test_chunks_respect_max_size() {
        let text = "word ".repeat(500); // 2500 chars
        let chunks = split_text(&text, 1000, 200);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 1000, "chunk too long");
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let text = "word ".repeat(500);
        let chunks = split_text(&text, 1000, 200);
        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().rev().take(50).collect::<String>();
            let tail: String = tail.chars().rev().collect();
            assert!(
                pair[1].contains(tail.trim()),
                "second chunk should repeat the first chunk's tail"
            );
        }
    }

    #[test]
    fn test_prefers_paragraph_boundary() {
        let para_a = "a".repeat(700);
        let para_b = "b".repeat(700);
        let text = format!("{para_a}\n\n{para_b}");
        let chunks = split_text(&text, 1000, 0);
        assert_eq!(chunks[0], para_a);
    }

    #[test]
    fn test_unbroken_token_splits_hard() {
        let text = "x".repeat(2500);
        let chunks = split_text(&text, 1000, 0);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 1000);
    }

    #[test]
    fn test_full_text_is_covered() {
        let text = (0..300)
            .map(|i| format!("line number {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = split_text(&text, 1000, 200);
        let joined = chunks.join("\n");
        assert!(joined.contains("line number 0"));
        assert!(joined.contains("line number 299"));
    }
}
