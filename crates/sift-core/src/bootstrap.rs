//! Build providers, tools, and the vector store from [`Settings`].

use std::path::Path;
use std::sync::Arc;

use sift_llm::compatible::CompatibleProvider;
use sift_memory::{InMemoryVectorStore, MemoryError};
use sift_tools::WebSearchTool;

use crate::config::{ConfigError, Settings};

/// Groq chat provider.
///
/// # Errors
///
/// Returns [`ConfigError::MissingCredential`] when `GROQ_API_KEY` is unset.
pub fn chat_provider(settings: &Settings) -> Result<CompatibleProvider, ConfigError> {
    let key = settings
        .secrets
        .groq_api_key
        .as_ref()
        .ok_or(ConfigError::MissingCredential("GROQ_API_KEY"))?;

    Ok(CompatibleProvider::new(
        "groq".into(),
        key.expose().to_owned(),
        settings.llm.base_url.clone(),
        settings.llm.model.clone(),
        settings.llm.max_tokens,
        None,
    )
    .with_temperature(settings.llm.temperature))
}

/// Embedding provider. Groq serves no embeddings, so this targets the
/// configured OpenAI-compatible endpoint (Ollama by default), which needs no key.
#[must_use]
pub fn embedding_provider(settings: &Settings) -> CompatibleProvider {
    CompatibleProvider::new(
        "embeddings".into(),
        String::new(),
        settings.embedding.base_url.clone(),
        settings.embedding.model.clone(),
        settings.llm.max_tokens,
        Some(settings.embedding.model.clone()),
    )
}

/// # Errors
///
/// Returns [`ConfigError::MissingCredential`] when `TAVILY_API_KEY` is unset.
pub fn web_search_tool(settings: &Settings) -> Result<WebSearchTool, ConfigError> {
    let key = settings
        .secrets
        .tavily_api_key
        .as_ref()
        .ok_or(ConfigError::MissingCredential("TAVILY_API_KEY"))?;
    Ok(WebSearchTool::new(key.expose(), &settings.search))
}

/// Load the snapshot at `path`, or start empty when there is none.
///
/// # Errors
///
/// Returns an error if the snapshot exists but cannot be read.
pub fn open_store(path: &Path) -> Result<Arc<InMemoryVectorStore>, MemoryError> {
    if path.exists() {
        tracing::debug!(path = %path.display(), "loading vector store snapshot");
        Ok(Arc::new(InMemoryVectorStore::load(path)?))
    } else {
        Ok(Arc::new(InMemoryVectorStore::new()))
    }
}
