use std::path::Path;

use super::super::{DEFAULT_MAX_FILE_SIZE, Document, DocumentError, Metadata, MetadataValue};
use super::DocumentLoader;

/// Loads a UTF-8 text file as a single [`Document`].
#[derive(Debug, Clone)]
pub struct TextLoader {
    pub max_file_size: u64,
}

impl Default for TextLoader {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl DocumentLoader for TextLoader {
    fn load(&self, path: &Path) -> Result<Vec<Document>, DocumentError> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > self.max_file_size {
            return Err(DocumentError::FileTooLarge(meta.len()));
        }

        let content = std::fs::read_to_string(path)?;
        let metadata = Metadata::from([(
            "source".to_owned(),
            MetadataValue::from(path.display().to_string()),
        )]);

        Ok(vec![Document::new(content, metadata)])
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }
}
