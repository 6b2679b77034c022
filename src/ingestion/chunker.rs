//! Text chunking with line number tracking
//!
//! Splits text into overlapping fixed-size windows, shortening each window
//! to the last sentence or line break when one falls in its second half.
//! Every chunk carries the 1-based source lines it covers so answers can
//! cite exact locations.

/// A chunk of text with the source lines it spans
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// Trimmed chunk text
    pub text: String,
    /// First line covered (1-based)
    pub start_line: u32,
    /// Last line covered (1-based, inclusive)
    pub end_line: u32,
}

/// Text chunker with configurable window size and overlap
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Split `text` into overlapping chunks with line attribution.
    ///
    /// All offsets are in characters, not bytes. Whitespace-only windows are
    /// discarded, so empty input yields no chunks.
    pub fn chunk_text(&self, text: &str) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        let text_length = chars.len();

        // (start_char, end_char, line_number) per line; end excludes the
        // terminating newline
        let mut line_positions: Vec<(usize, usize, u32)> = Vec::new();
        let mut current_pos = 0usize;
        for (i, line) in text.split('\n').enumerate() {
            let len = line.chars().count();
            line_positions.push((current_pos, current_pos + len, i as u32 + 1));
            current_pos += len + 1;
        }

        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < text_length {
            // end stays un-clamped: the final window's advance and line
            // attribution both use the raw offset
            let mut end = start + self.chunk_size;
            let mut window = &chars[start..end.min(text_length)];

            // Prefer ending on a sentence or line break when one falls in
            // the second half of the window
            if end < text_length {
                let last_period = window.iter().rposition(|&c| c == '.');
                let last_newline = window.iter().rposition(|&c| c == '\n');
                if let Some(break_point) = last_period.max(last_newline) {
                    if break_point as f64 > self.chunk_size as f64 * 0.5 {
                        window = &chars[start..start + break_point + 1];
                        end = start + break_point + 1;
                    }
                }
            }

            let (start_line, end_line) = attribute_lines(&line_positions, start, end);

            let piece: String = window.iter().collect();
            let trimmed = piece.trim();
            if !trimmed.is_empty() {
                chunks.push(TextChunk {
                    text: trimmed.to_string(),
                    start_line,
                    end_line,
                });
            }

            let next_start = end.saturating_sub(self.overlap);
            if next_start <= start {
                // non-advancing window; cannot happen with validated config
                break;
            }
            start = next_start;
        }

        chunks
    }
}

/// Map a chunk's character span onto 1-based line numbers.
///
/// `end` is the window's raw end offset and may exceed the text length for
/// the final window. When a window ends exactly on a line break, the match
/// branch `pos_start < end <= pos_end` resolves `end_line` to the line the
/// break terminates, one line before the span the next window starts in.
fn attribute_lines(line_positions: &[(usize, usize, u32)], start: usize, end: usize) -> (u32, u32) {
    let mut start_line = 1u32;
    let mut end_line = 1u32;

    for &(pos_start, pos_end, line_num) in line_positions {
        if (pos_start <= start && start < pos_end) || (pos_start <= start && pos_end >= start) {
            start_line = line_num;
        }
        if (pos_start < end && end <= pos_end) || (pos_start < end && pos_end >= end) {
            end_line = line_num;
            break;
        }
        if pos_start >= end {
            break;
        }
        end_line = line_num;
    }

    (start_line, end_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        let chunker = TextChunker::new(100, 20);
        assert!(chunker.chunk_text("").is_empty());
        assert!(chunker.chunk_text("   \n\n  ").is_empty());
    }

    #[test]
    fn short_text_single_chunk() {
        let chunker = TextChunker::new(100, 20);
        let chunks = chunker.chunk_text("hello world");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "hello world");
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].end_line, 1);
    }

    #[test]
    fn windows_advance_by_size_minus_overlap() {
        // No '.' or '\n', so windows are never shortened
        let text = "a".repeat(250);
        let chunker = TextChunker::new(100, 20);
        let chunks = chunker.chunk_text(&text);
        // window starts: 0, 80, 160, 240
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].text.len(), 100);
        assert_eq!(chunks[1].text.len(), 100);
        assert_eq!(chunks[2].text.len(), 90);
        assert_eq!(chunks[3].text.len(), 10);
    }

    #[test]
    fn breaks_at_sentence_boundary_past_half_window() {
        // Period at index 79, past half of the 100-char window
        let mut text = "b".repeat(79);
        text.push('.');
        text.push_str(&"c".repeat(120));
        let chunker = TextChunker::new(100, 20);
        let chunks = chunker.chunk_text(&text);
        assert_eq!(chunks[0].text.len(), 80);
        assert!(chunks[0].text.ends_with('.'));
        // next window starts at 80 - 20 = 60, inside the run of 'b'
        assert!(chunks[1].text.starts_with("bbb"));
    }

    #[test]
    fn ignores_break_in_first_half_of_window() {
        // Period at index 10, before the midpoint: window stays full-size
        let mut text = "d".repeat(10);
        text.push('.');
        text.push_str(&"e".repeat(150));
        let chunker = TextChunker::new(100, 20);
        let chunks = chunker.chunk_text(&text);
        assert_eq!(chunks[0].text.len(), 100);
    }

    #[test]
    fn line_numbers_track_multiline_text() {
        let text = (1..=10)
            .map(|i| format!("line number {:02}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let chunker = TextChunker::new(40, 10);
        let chunks = chunker.chunk_text(&text);
        assert_eq!(chunks[0].start_line, 1);
        assert!(chunks[0].end_line >= 2);
        let last = chunks.last().unwrap();
        assert_eq!(last.end_line, 10);
        // line numbers never decrease across chunks
        for pair in chunks.windows(2) {
            assert!(pair[1].start_line >= pair[0].start_line);
        }
    }

    #[test]
    fn end_line_at_exact_line_break_boundary() {
        // Line spans: (0,4), (5,9), (10,14). The first window ends exactly
        // on the newline at offset 4..5, and the boundary branch resolves
        // end_line to line 1. Pinned: citations expose these exact numbers.
        let text = "aaaa\nbbbb\ncccc";
        let chunker = TextChunker::new(5, 1);
        let chunks = chunker.chunk_text(text);
        assert_eq!(chunks[0].text, "aaaa");
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].end_line, 1);
    }

    #[test]
    fn final_window_covers_remaining_lines() {
        let text = "first line\nsecond line\nthird line";
        let chunks = TextChunker::new(1000, 200).chunk_text(text);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start_line, 1);
        assert_eq!(chunks[0].end_line, 3);
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "The quick brown fox. Jumps over the lazy dog.\n".repeat(40);
        let chunker = TextChunker::new(100, 20);
        assert_eq!(chunker.chunk_text(&text), chunker.chunk_text(&text));
    }

    #[test]
    fn multibyte_text_counts_characters() {
        // 3-byte chars; byte-based windows would split mid-character
        let text = "日本語のテキスト。".repeat(30);
        let chunker = TextChunker::new(50, 10);
        let chunks = chunker.chunk_text(&text);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 50);
        }
    }
}
