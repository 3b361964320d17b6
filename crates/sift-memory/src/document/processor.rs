use std::path::Path;

use super::{
    Chunk, Document, DocumentError, LoaderRegistry, Metadata, SplitterConfig, TextSplitter,
};

/// Load-then-split facade over a [`LoaderRegistry`] and a [`TextSplitter`].
#[derive(Debug, Clone)]
pub struct DocumentProcessor {
    loaders: LoaderRegistry,
    splitter: TextSplitter,
}

impl DocumentProcessor {
    /// Processor with the default loaders.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidConfig`] when the splitter config is rejected.
    pub fn new(config: SplitterConfig) -> Result<Self, DocumentError> {
        Ok(Self::with_loaders(
            LoaderRegistry::with_defaults(),
            TextSplitter::new(config)?,
        ))
    }

    #[must_use]
    pub fn with_loaders(loaders: LoaderRegistry, splitter: TextSplitter) -> Self {
        Self { loaders, splitter }
    }

    #[must_use]
    pub fn splitter(&self) -> &TextSplitter {
        &self.splitter
    }

    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedFormat`] for unknown extensions and
    /// loader errors unchanged.
    pub fn load_document(&self, path: impl AsRef<Path>) -> Result<Vec<Document>, DocumentError> {
        self.loaders.load(path.as_ref())
    }

    /// Wrap raw text into exactly one [`Document`]. No splitting happens here.
    #[must_use]
    pub fn load_from_text(&self, text: &str, metadata: Option<Metadata>) -> Vec<Document> {
        vec![Document::new(text, metadata.unwrap_or_default())]
    }

    #[must_use]
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        self.splitter.split_documents(documents)
    }

    /// Load `path` and split the result.
    ///
    /// # Errors
    ///
    /// Propagates [`DocumentProcessor::load_document`] errors unchanged.
    pub fn process(&self, path: impl AsRef<Path>) -> Result<Vec<Chunk>, DocumentError> {
        let path = path.as_ref();
        let documents = self.load_document(path)?;
        let chunks = self.split_documents(&documents);
        tracing::debug!(
            path = %path.display(),
            documents = documents.len(),
            chunks = chunks.len(),
            "processed document"
        );
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MetadataValue;

    fn processor(chunk_size: usize, chunk_overlap: usize) -> DocumentProcessor {
        DocumentProcessor::new(SplitterConfig::new(chunk_size, chunk_overlap)).unwrap()
    }

    #[test]
    fn raw_text_wraps_into_one_chunk() {
        let p = processor(5, 0);
        let metadata = Metadata::from([("a".to_owned(), MetadataValue::from(1i64))]);
        let docs = p.load_from_text("hello", Some(metadata.clone()));
        assert_eq!(docs.len(), 1);

        let chunks = p.split_documents(&docs);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content(), "hello");
        assert_eq!(chunks[0].metadata(), &metadata);
    }

    #[test]
    fn raw_text_metadata_defaults_to_empty() {
        let docs = processor(100, 10).load_from_text("some text", None);
        assert_eq!(docs.len(), 1);
        assert!(docs[0].metadata().is_empty());
    }

    #[test]
    fn raw_text_is_not_split_on_load() {
        let text = "word ".repeat(100);
        let docs = processor(10, 2).load_from_text(&text, None);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content(), text);
    }

    #[test]
    fn empty_document_yields_no_chunks() {
        let p = processor(100, 10);
        let docs = p.load_from_text("", None);
        assert!(p.split_documents(&docs).is_empty());
    }

    #[test]
    fn invalid_config_rejected() {
        let err = DocumentProcessor::new(SplitterConfig::new(100, 100)).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidConfig(_)));
    }

    #[test]
    fn process_unsupported_extension() {
        let err = processor(100, 10).process("slides.key").unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedFormat(ref ext) if ext == ".key"));
    }

    #[test]
    fn process_missing_file_propagates_io() {
        let err = processor(100, 10)
            .process("/nonexistent/dir/notes.txt")
            .unwrap_err();
        assert!(matches!(err, DocumentError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn process_thousand_char_file() {
        let sentence = "Retrieval augmented generation grounds answers in indexed documents. ";
        let text: String = sentence.repeat(20).chars().take(1000).collect();
        assert_eq!(text.chars().count(), 1000);

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sample.txt");
        std::fs::write(&file, &text).unwrap();

        let chunks = processor(300, 50).process(&file).unwrap();
        assert!(chunks.len() >= 4, "got {} chunks", chunks.len());

        let source = file.display().to_string();
        let mut covered = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index(), i);
            assert!(chunk.content().chars().count() <= 300);
            assert_eq!(chunk.source(), Some(source.as_str()));

            let start = chunk.offset();
            let end = start + chunk.content().len();
            assert_eq!(&text[start..end], chunk.content());
            assert!(
                text[covered.min(start)..start].trim().is_empty(),
                "gap before chunk {i} drops text"
            );
            if i > 0 {
                let prev = &chunks[i - 1];
                let prev_end = prev.offset() + prev.content().len();
                assert!(start > prev.offset());
                assert!(prev_end.saturating_sub(start) <= 50);
            }
            covered = covered.max(end);
        }
        assert_eq!(chunks[0].offset(), 0);
        assert_eq!(covered, text.len());
    }
}
