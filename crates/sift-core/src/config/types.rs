use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sift_tools::WebSearchConfig;

use crate::secret::Secret;

/// Application settings: optional TOML file, then environment overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: WebSearchConfig,
    /// Credentials come from the environment only.
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedSecrets {
    pub groq_api_key: Option<Secret>,
    pub tavily_api_key: Option<Secret>,
}

fn default_llm_model() -> String {
    "llama-3.3-70b-versatile".into()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_llm_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}

fn default_max_tokens() -> u32 {
    1024
}

/// Chat model served by Groq's OpenAI-compatible API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            temperature: default_temperature(),
            base_url: default_llm_base_url(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_embedding_model() -> String {
    "nomic-embed-text".into()
}

fn default_embedding_base_url() -> String {
    "http://localhost:11434/v1".into()
}

/// Embedding model behind an OpenAI-compatible `/embeddings` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            base_url: default_embedding_base_url(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_index_path() -> PathBuf {
    PathBuf::from("./data/sift_index.json")
}

fn default_top_k() -> usize {
    3
}

/// Where the vector store snapshot lives and how many chunks a query retrieves.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_path")]
    pub path: PathBuf,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            top_k: default_top_k(),
        }
    }
}
