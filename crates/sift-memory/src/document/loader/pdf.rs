use std::path::Path;

use super::super::{DEFAULT_MAX_FILE_SIZE, Document, DocumentError, Metadata, MetadataValue};
use super::DocumentLoader;

/// Loads a PDF as one [`Document`] per page, tagged with a 0-based `page`.
#[derive(Debug, Clone)]
pub struct PdfLoader {
    pub max_file_size: u64,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<Vec<Document>, DocumentError> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > self.max_file_size {
            return Err(DocumentError::FileTooLarge(meta.len()));
        }

        let pages = pdf_extract::extract_text_by_pages(path)
            .map_err(|e| DocumentError::Pdf(e.to_string()))?;
        tracing::debug!(path = %path.display(), pages = pages.len(), "extracted pdf text");

        let source = path.display().to_string();
        Ok(pages
            .into_iter()
            .enumerate()
            .map(|(page, content)| {
                let metadata = Metadata::from([
                    ("source".to_owned(), MetadataValue::from(source.as_str())),
                    ("page".to_owned(), MetadataValue::from(page)),
                ]);
                Document::new(content, metadata)
            })
            .collect())
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }
}
