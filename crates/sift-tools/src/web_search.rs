use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{SearchTopic, WebSearchConfig};
use crate::error::ToolError;

/// Value of [`SearchContext::source`].
pub const SOURCE: &str = "tavily_web_search";

/// One hit returned by the search API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Short generated answer, when the API produced one.
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    /// Non-empty result URLs in result order.
    #[must_use]
    pub fn urls(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter_map(|r| r.url.as_deref())
            .filter(|u| !u.is_empty())
            .collect()
    }

    /// Human-readable rendering used as LLM context and CLI output.
    #[must_use]
    pub fn format(&self) -> String {
        let mut parts = Vec::with_capacity(self.results.len() + 1);

        if let Some(answer) = self.answer.as_deref().filter(|a| !a.is_empty()) {
            parts.push(format!("Summary: {answer}"));
        }

        for (i, result) in self.results.iter().enumerate() {
            parts.push(format!(
                "[{}] {}\n{}\nSource: {}",
                i + 1,
                result.title.as_deref().unwrap_or("No title"),
                result.content.as_deref().unwrap_or("No content"),
                result.url.as_deref().unwrap_or_default(),
            ));
        }

        if parts.is_empty() {
            "No results found.".to_owned()
        } else {
            parts.join("\n\n")
        }
    }
}

/// Structured search output: raw results plus their formatted view.
#[derive(Debug, Clone, Serialize)]
pub struct SearchContext {
    pub query: String,
    pub results: SearchResponse,
    pub formatted: String,
    pub source: &'static str,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    topic: SearchTopic,
    include_answer: bool,
}

/// Web search over the Tavily REST API.
#[derive(Clone)]
pub struct WebSearchTool {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_results: usize,
    topic: SearchTopic,
}

impl fmt::Debug for WebSearchTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSearchTool")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_results", &self.max_results)
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}

impl WebSearchTool {
    #[must_use]
    pub fn new(api_key: impl Into<String>, config: &WebSearchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .redirect(reqwest::redirect::Policy::limited(3))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            max_results: config.max_results,
            topic: config.topic,
        }
    }

    /// # Errors
    ///
    /// Returns [`ToolError::Http`] on transport failure, [`ToolError::Status`]
    /// on a non-success response, and [`ToolError::Json`] when the body does
    /// not parse.
    pub async fn search_raw(&self, query: &str) -> Result<SearchResponse, ToolError> {
        let body = SearchRequest {
            query,
            max_results: self.max_results,
            topic: self.topic,
            include_answer: true,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!("web search API error {status}: {text}");
            return Err(ToolError::Status {
                status: status.as_u16(),
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&text)?;
        tracing::debug!(query, results = parsed.results.len(), "web search");
        Ok(parsed)
    }

    /// Search and return the formatted results.
    ///
    /// # Errors
    ///
    /// See [`WebSearchTool::search_raw`].
    pub async fn search(&self, query: &str) -> Result<String, ToolError> {
        Ok(self.search_raw(query).await?.format())
    }

    /// # Errors
    ///
    /// See [`WebSearchTool::search_raw`].
    pub async fn search_with_context(&self, query: &str) -> Result<SearchContext, ToolError> {
        let results = self.search_raw(query).await?;
        let formatted = results.format();
        Ok(SearchContext {
            query: query.to_owned(),
            results,
            formatted,
            source: SOURCE,
        })
    }
}
