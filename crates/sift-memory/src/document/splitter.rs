//! Recursive separator splitting with overlapping windows.
//!
//! A segment is cut on the coarsest separator it contains (paragraph break,
//! line break, space, then single characters). Pieces no longer than
//! `chunk_size` are merged greedily into windows; longer pieces descend to the
//! next finer separator. Separators stay attached to the start of the piece
//! that follows them, so every window is a contiguous slice of the source.
//! Lengths are counted in chars and the size bound is inclusive.

use std::collections::VecDeque;

use super::error::DocumentError;
use super::types::{Chunk, Document};

pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Tried coarsest first. An empty string means per-character.
    pub separators: Vec<String>,
}

impl SplitterConfig {
    #[must_use]
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            ..Self::default()
        }
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separators: DEFAULT_SEPARATORS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextSplitter {
    config: SplitterConfig,
}

/// Byte range into the document plus its length in chars.
#[derive(Debug, Clone, Copy)]
struct Piece {
    start: usize,
    end: usize,
    len: usize,
}

impl TextSplitter {
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidConfig`] when `chunk_size` is zero,
    /// `chunk_overlap >= chunk_size`, or no separator is configured.
    pub fn new(config: SplitterConfig) -> Result<Self, DocumentError> {
        if config.chunk_size == 0 {
            return Err(DocumentError::InvalidConfig(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if config.chunk_overlap >= config.chunk_size {
            return Err(DocumentError::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                config.chunk_overlap, config.chunk_size
            )));
        }
        if config.separators.is_empty() {
            return Err(DocumentError::InvalidConfig(
                "at least one separator is required".into(),
            ));
        }
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    #[must_use]
    pub fn split(&self, document: &Document) -> Vec<Chunk> {
        let text = document.content();
        if text.is_empty() {
            return Vec::new();
        }

        let mut windows = Vec::new();
        self.split_range(text, 0, text.len(), &self.config.separators, &mut windows);

        windows
            .into_iter()
            .enumerate()
            .map(|(i, (start, end))| {
                Chunk::new(
                    text[start..end].to_owned(),
                    document.metadata().clone(),
                    i,
                    start,
                )
            })
            .collect()
    }

    /// Split every document in order; chunks of one document stay contiguous.
    #[must_use]
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        documents.iter().flat_map(|doc| self.split(doc)).collect()
    }

    fn split_range(
        &self,
        text: &str,
        start: usize,
        end: usize,
        separators: &[String],
        out: &mut Vec<(usize, usize)>,
    ) {
        let segment = &text[start..end];
        let (separator, finer) = pick_separator(segment, separators);

        let mut fitting = Vec::new();
        for (s, e) in cut(segment, separator) {
            let piece = Piece {
                start: start + s,
                end: start + e,
                len: segment[s..e].chars().count(),
            };
            if piece.len <= self.config.chunk_size {
                fitting.push(piece);
                continue;
            }
            if !fitting.is_empty() {
                self.merge(text, &fitting, out);
                fitting.clear();
            }
            if finer.is_empty() {
                push_trimmed(text, piece.start, piece.end, out);
            } else {
                self.split_range(text, piece.start, piece.end, finer, out);
            }
        }

        if !fitting.is_empty() {
            self.merge(text, &fitting, out);
        }
    }

    fn merge(&self, text: &str, pieces: &[Piece], out: &mut Vec<(usize, usize)>) {
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut window: VecDeque<Piece> = VecDeque::new();
        let mut total = 0;

        for &piece in pieces {
            if total + piece.len > size && !window.is_empty() {
                emit(text, &window, out);
                // Keep at most `overlap` chars of tail, and only as much as lets the next piece fit.
                while total > overlap || (total + piece.len > size && total > 0) {
                    let Some(front) = window.pop_front() else {
                        break;
                    };
                    total -= front.len;
                }
            }
            window.push_back(piece);
            total += piece.len;
        }

        emit(text, &window, out);
    }
}

fn pick_separator<'a>(segment: &str, separators: &'a [String]) -> (&'a str, &'a [String]) {
    for (i, separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return ("", &[]);
        }
        if segment.contains(separator.as_str()) {
            return (separator, &separators[i + 1..]);
        }
    }
    (separators.last().map_or("", String::as_str), &[])
}

/// Cut `segment` before every occurrence of `separator`; empty pieces are dropped.
fn cut(segment: &str, separator: &str) -> Vec<(usize, usize)> {
    if separator.is_empty() {
        return segment
            .char_indices()
            .map(|(i, c)| (i, i + c.len_utf8()))
            .collect();
    }

    let bounds: Vec<usize> = std::iter::once(0)
        .chain(segment.match_indices(separator).map(|(i, _)| i))
        .chain(std::iter::once(segment.len()))
        .collect();

    bounds
        .windows(2)
        .filter(|w| w[0] < w[1])
        .map(|w| (w[0], w[1]))
        .collect()
}

fn emit(text: &str, window: &VecDeque<Piece>, out: &mut Vec<(usize, usize)>) {
    if let (Some(first), Some(last)) = (window.front(), window.back()) {
        push_trimmed(text, first.start, last.end, out);
    }
}

fn push_trimmed(text: &str, start: usize, end: usize, out: &mut Vec<(usize, usize)>) {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start().len();
    let span = (start + lead, start + lead + trimmed.len());
    // A window that adds only whitespace after the previous one carries no new text.
    if out.last().is_some_and(|&(_, prev_end)| span.1 <= prev_end) {
        return;
    }
    out.push(span);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::types::{Metadata, MetadataValue};

    fn make_doc(content: &str) -> Document {
        Document::new(
            content,
            Metadata::from([("source".to_owned(), MetadataValue::from("test"))]),
        )
    }

    fn splitter(chunk_size: usize, chunk_overlap: usize) -> TextSplitter {
        TextSplitter::new(SplitterConfig::new(chunk_size, chunk_overlap)).unwrap()
    }

    fn contents(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(Chunk::content).collect()
    }

    #[test]
    fn empty_document() {
        let chunks = splitter(10, 2).split(&make_doc(""));
        assert!(chunks.is_empty());
    }

    #[test]
    fn whitespace_only_document() {
        let chunks = splitter(10, 2).split(&make_doc(" \n\n  \n"));
        assert!(chunks.is_empty());
    }

    #[test]
    fn document_smaller_than_chunk_size() {
        let chunks = splitter(1000, 100).split(&make_doc("Short text."));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content(), "Short text.");
        assert_eq!(chunks[0].chunk_index(), 0);
        assert_eq!(chunks[0].offset(), 0);
    }

    #[test]
    fn exactly_chunk_size_is_one_chunk() {
        let chunks = splitter(5, 1).split(&make_doc("hello"));
        assert_eq!(contents(&chunks), vec!["hello"]);
    }

    #[test]
    fn rejects_overlap_not_below_size() {
        let err = TextSplitter::new(SplitterConfig::new(10, 10)).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidConfig(_)));
        assert!(TextSplitter::new(SplitterConfig::new(10, 25)).is_err());
    }

    #[test]
    fn rejects_zero_size_and_no_separators() {
        assert!(TextSplitter::new(SplitterConfig::new(0, 0)).is_err());
        let config = SplitterConfig {
            separators: Vec::new(),
            ..SplitterConfig::new(10, 0)
        };
        assert!(TextSplitter::new(config).is_err());
    }

    #[test]
    fn paragraphs_split_before_lines() {
        let text = "alpha beta\ngamma\n\ndelta epsilon";
        let chunks = splitter(16, 0).split(&make_doc(text));
        assert_eq!(contents(&chunks), vec!["alpha beta\ngamma", "delta epsilon"]);
    }

    #[test]
    fn oversized_paragraph_descends_to_lines_then_words() {
        let text = "one two three four\nfive six";
        let chunks = splitter(10, 0).split(&make_doc(text));
        assert_eq!(
            contents(&chunks),
            vec!["one two", "three", "four", "five six"]
        );
    }

    #[test]
    fn unbroken_token_falls_back_to_characters_with_overlap() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = splitter(10, 3).split(&make_doc(text));
        assert_eq!(
            contents(&chunks),
            vec!["abcdefghij", "hijklmnopq", "opqrstuvwx", "vwxyz"]
        );
        assert_eq!(&chunks[0].content()[7..10], &chunks[1].content()[..3]);
    }

    #[test]
    fn word_overlap_carries_trailing_words() {
        let text = "aa bb cc dd ee ff";
        let chunks = splitter(8, 3).split(&make_doc(text));
        assert_eq!(contents(&chunks), vec!["aa bb cc", "cc dd", "dd ee", "ee ff"]);
    }

    #[test]
    fn without_char_separator_long_token_is_kept_whole() {
        let config = SplitterConfig {
            separators: vec!["\n\n".into(), "\n".into(), " ".into()],
            ..SplitterConfig::new(5, 0)
        };
        let chunks = TextSplitter::new(config)
            .unwrap()
            .split(&make_doc("ab incomprehensible cd"));
        assert_eq!(contents(&chunks), vec!["ab", "incomprehensible", "cd"]);
    }

    #[test]
    fn offsets_locate_chunks_in_source() {
        let text = "First paragraph here.\n\nSecond one follows.\nAnd a third line.";
        let doc = make_doc(text);
        for chunk in splitter(20, 5).split(&doc) {
            let start = chunk.offset();
            assert_eq!(&text[start..start + chunk.content().len()], chunk.content());
        }
    }

    #[test]
    fn multibyte_text_respects_char_boundaries() {
        let text = "héllo wörld ünïcode ✓✓✓✓✓✓✓✓✓✓✓✓";
        let chunks = splitter(6, 2).split(&make_doc(text));
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.content().chars().count() <= 6);
        }
    }

    #[test]
    fn metadata_preserved_without_extra_keys() {
        let doc = make_doc("Some content that is long enough to split into pieces.");
        let chunks = splitter(12, 4).split(&doc);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert_eq!(chunk.metadata(), doc.metadata());
        }
    }

    #[test]
    fn split_documents_keeps_document_order() {
        let docs = vec![
            Document::new(
                "first doc text goes here",
                Metadata::from([("source".to_owned(), MetadataValue::from("a"))]),
            ),
            Document::new(
                "second doc text",
                Metadata::from([("source".to_owned(), MetadataValue::from("b"))]),
            ),
        ];
        let chunks = splitter(10, 0).split_documents(&docs);
        let sources: Vec<_> = chunks.iter().map(|c| c.source().unwrap()).collect();
        let first_b = sources.iter().position(|s| *s == "b").unwrap();
        assert!(sources[..first_b].iter().all(|s| *s == "a"));
        assert!(sources[first_b..].iter().all(|s| *s == "b"));
        assert_eq!(chunks[first_b].chunk_index(), 0);
    }

    #[test]
    fn cut_keeps_separator_on_following_piece() {
        let pieces = cut("a\n\nb\n\nc", "\n\n");
        assert_eq!(pieces, vec![(0, 1), (1, 4), (4, 7)]);
        assert_eq!(cut("\n\nx", "\n\n"), vec![(0, 3)]);
    }

    #[test]
    fn pick_separator_prefers_coarsest_present() {
        let seps: Vec<String> = DEFAULT_SEPARATORS.iter().map(|s| (*s).to_owned()).collect();
        let (sep, finer) = pick_separator("a b\nc", &seps);
        assert_eq!(sep, "\n");
        assert_eq!(finer.len(), 2);
        let (sep, finer) = pick_separator("abc", &seps);
        assert_eq!(sep, "");
        assert!(finer.is_empty());
    }

    mod proptest_splitter {
        use super::*;
        use proptest::prelude::*;

        fn check_invariants(text: &str, chunk_size: usize, chunk_overlap: usize) -> Result<(), TestCaseError> {
            let doc = make_doc(text);
            let chunks = splitter(chunk_size, chunk_overlap).split(&doc);

            let mut prev: Option<&Chunk> = None;
            let mut covered_to = 0;
            for (i, chunk) in chunks.iter().enumerate() {
                let start = chunk.offset();
                let end = start + chunk.content().len();
                prop_assert_eq!(chunk.chunk_index(), i);
                prop_assert!(!chunk.content().is_empty());
                prop_assert!(chunk.content().chars().count() <= chunk_size);
                prop_assert_eq!(&text[start..end], chunk.content());
                prop_assert_eq!(chunk.metadata(), doc.metadata());

                if let Some(p) = prev {
                    let prev_end = p.offset() + p.content().len();
                    prop_assert!(start >= p.offset(), "chunks out of order");
                    prop_assert!(end > prev_end, "chunk adds no new text");
                    if start < prev_end {
                        prop_assert!(text[start..prev_end].chars().count() <= chunk_overlap);
                    }
                }
                if start > covered_to {
                    prop_assert!(text[covered_to..start].trim().is_empty(), "lost content");
                }
                covered_to = covered_to.max(end);
                prev = Some(chunk);
            }
            prop_assert!(text[covered_to..].trim().is_empty(), "lost trailing content");
            Ok(())
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn split_never_panics(
                content in "\\PC{0,2000}",
                chunk_size in 1usize..400,
                overlap_ratio in 0.0f64..1.0,
            ) {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
                let chunk_overlap = ((chunk_size as f64) * overlap_ratio) as usize;
                let chunk_overlap = chunk_overlap.min(chunk_size - 1);
                let _ = splitter(chunk_size, chunk_overlap).split(&make_doc(&content));
            }

            #[test]
            fn prose_invariants(
                content in "[a-z]{1,12}([ \n]{1,3}[a-z]{1,12}){0,150}",
                chunk_size in 5usize..120,
                chunk_overlap in 0usize..40,
            ) {
                let chunk_overlap = chunk_overlap.min(chunk_size - 1);
                check_invariants(&content, chunk_size, chunk_overlap)?;
            }

            #[test]
            fn arbitrary_text_invariants(
                content in "\\PC{0,600}",
                chunk_size in 1usize..80,
                chunk_overlap in 0usize..20,
            ) {
                let chunk_overlap = chunk_overlap.min(chunk_size - 1);
                check_invariants(&content, chunk_size, chunk_overlap)?;
            }
        }
    }
}
