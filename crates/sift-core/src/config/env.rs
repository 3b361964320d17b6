use std::str::FromStr;

use super::{ConfigError, Settings};
use crate::secret::Secret;

impl Settings {
    pub(crate) fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values count as unset.
    pub(crate) fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("GROQ_API_KEY") {
            self.secrets.groq_api_key = Some(Secret::new(v));
        }
        if let Some(v) = get("TAVILY_API_KEY") {
            self.secrets.tavily_api_key = Some(Secret::new(v));
        }

        if let Some(v) = get("LLM_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = get("LLM_TEMPERATURE") {
            self.llm.temperature = parse_finite("LLM_TEMPERATURE", &v)?;
        }
        if let Some(v) = get("LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = get("LLM_MAX_TOKENS") {
            self.llm.max_tokens = parse("LLM_MAX_TOKENS", &v)?;
        }

        if let Some(v) = get("EMBEDDING_MODEL") {
            self.embedding.model = v;
        }
        if let Some(v) = get("EMBEDDING_BASE_URL") {
            self.embedding.base_url = v;
        }

        if let Some(v) = get("CHUNK_SIZE") {
            self.chunking.chunk_size = parse("CHUNK_SIZE", &v)?;
        }
        if let Some(v) = get("CHUNK_OVERLAP") {
            self.chunking.chunk_overlap = parse("CHUNK_OVERLAP", &v)?;
        }

        if let Some(v) = get("FAST_INDEX_PATH") {
            self.index.path = v.into();
        }
        if let Some(v) = get("TOP_K_RESULT") {
            self.index.top_k = parse("TOP_K_RESULT", &v)?;
        }

        if let Some(v) = get("SEARCH_MAX_RESULTS") {
            self.search.max_results = parse("SEARCH_MAX_RESULTS", &v)?;
        }
        if let Some(v) = get("SEARCH_TOPIC") {
            self.search.topic = parse("SEARCH_TOPIC", &v)?;
        }

        Ok(())
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

/// `NaN` and infinities parse as `f32` but are never a usable setting.
fn parse_finite(key: &'static str, value: &str) -> Result<f32, ConfigError> {
    let parsed: f32 = parse(key, value)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(invalid(key, value))
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    tracing::debug!(key, value, "rejecting malformed environment value");
    ConfigError::InvalidValue {
        key,
        value: value.to_owned(),
    }
}
