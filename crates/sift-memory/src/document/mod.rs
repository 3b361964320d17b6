pub mod error;
pub mod loader;
pub mod processor;
pub mod splitter;
pub mod types;

pub use error::DocumentError;
pub use loader::{DocumentLoader, LoaderRegistry, TextLoader};
pub use processor::DocumentProcessor;
pub use splitter::{DEFAULT_SEPARATORS, SplitterConfig, TextSplitter};
pub use types::{Chunk, Document, Metadata, MetadataValue};

#[cfg(feature = "pdf")]
pub use loader::PdfLoader;

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
