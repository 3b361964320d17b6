//! Web search tool backed by the Tavily API.

pub mod config;
pub mod error;
pub mod web_search;

pub use config::{SearchTopic, WebSearchConfig};
pub use error::ToolError;
pub use web_search::{SearchContext, SearchResponse, SearchResult, WebSearchTool};
