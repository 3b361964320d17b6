mod env;
mod types;


pub use types::*;

use std::path::{Path, PathBuf};

use sift_memory::document::SplitterConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set, add it to your environment or .env file")]
    MissingCredential(&'static str),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Settings {
    /// Load settings from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// an environment variable holds a malformed value.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_owned(),
                source,
            })?;
            let settings = toml::from_str::<Self>(&content)?;
            if !settings.llm.temperature.is_finite() {
                return Err(ConfigError::InvalidValue {
                    key: "llm.temperature",
                    value: settings.llm.temperature.to_string(),
                });
            }
            settings
        } else {
            Self::default()
        };

        settings.apply_env_overrides()?;
        Ok(settings)
    }

    /// Defaults plus environment overrides, without a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a malformed environment variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        settings.apply_env_overrides()?;
        Ok(settings)
    }

    /// Check that both API credentials are present, Groq first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] naming the first missing key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secrets.groq_api_key.is_none() {
            return Err(ConfigError::MissingCredential("GROQ_API_KEY"));
        }
        if self.secrets.tavily_api_key.is_none() {
            return Err(ConfigError::MissingCredential("TAVILY_API_KEY"));
        }
        Ok(())
    }

    #[must_use]
    pub fn splitter_config(&self) -> SplitterConfig {
        SplitterConfig::new(self.chunking.chunk_size, self.chunking.chunk_overlap)
    }
}
