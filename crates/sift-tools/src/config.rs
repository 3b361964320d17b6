use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

fn default_max_results() -> usize {
    3
}

fn default_base_url() -> String {
    "https://api.tavily.com".into()
}

fn default_timeout() -> u64 {
    15
}

/// Search category understood by Tavily.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchTopic {
    #[default]
    General,
    News,
    Finance,
}

impl SearchTopic {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::News => "news",
            Self::Finance => "finance",
        }
    }
}

impl fmt::Display for SearchTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchTopic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "news" => Ok(Self::News),
            "finance" => Ok(Self::Finance),
            other => Err(format!(
                "unknown search topic {other:?}, expected general, news or finance"
            )),
        }
    }
}

/// Configuration for the web search tool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebSearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub topic: SearchTopic,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            topic: SearchTopic::default(),
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}
