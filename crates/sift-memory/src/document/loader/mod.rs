mod text;

#[cfg(feature = "pdf")]
mod pdf;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::{Document, DocumentError};

pub use text::TextLoader;

#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;

pub trait DocumentLoader: Send + Sync {
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] when the file cannot be read, or a
    /// format-specific error when its contents cannot be decoded.
    fn load(&self, path: &Path) -> Result<Vec<Document>, DocumentError>;

    /// Lowercase extensions without the leading dot.
    fn supported_extensions(&self) -> &[&str];
}

/// Routes a path to the loader registered for its extension.
#[derive(Clone, Default)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Arc<dyn DocumentLoader>>,
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut extensions: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        f.debug_struct("LoaderRegistry")
            .field("extensions", &extensions)
            .finish()
    }
}

impl LoaderRegistry {
    /// Registry with [`TextLoader`] for `.txt` and, with the `pdf` feature, [`PdfLoader`].
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register(TextLoader::default());
        #[cfg(feature = "pdf")]
        registry.register(PdfLoader::default());
        registry
    }

    /// Register `loader` for each of its extensions, replacing earlier entries.
    pub fn register(&mut self, loader: impl DocumentLoader + 'static) {
        let loader: Arc<dyn DocumentLoader> = Arc::new(loader);
        for ext in loader.supported_extensions() {
            self.loaders.insert(ext.to_lowercase(), Arc::clone(&loader));
        }
    }

    #[must_use]
    pub fn supports(&self, path: &Path) -> bool {
        self.loader_for(path).is_ok()
    }

    /// # Errors
    ///
    /// Returns [`DocumentError::UnsupportedFormat`] without touching the
    /// filesystem when no loader handles the extension, otherwise whatever the
    /// selected loader returns.
    pub fn load(&self, path: &Path) -> Result<Vec<Document>, DocumentError> {
        self.loader_for(path)?.load(path)
    }

    fn loader_for(&self, path: &Path) -> Result<&dyn DocumentLoader, DocumentError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.loaders
            .get(&ext.to_lowercase())
            .map(|loader| &**loader)
            .ok_or_else(|| {
                if ext.is_empty() {
                    DocumentError::UnsupportedFormat(String::new())
                } else {
                    DocumentError::UnsupportedFormat(format!(".{ext}"))
                }
            })
    }
}
