use sift_llm::{LlmError, LlmProvider, Message};
use sift_memory::{DocumentIndex, MemoryError, ScoredChunk};
use sift_tools::{ToolError, WebSearchTool};

const SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer the question using only \
the context below. If the context does not contain the answer, say that you don't know.";

/// Returned without calling the model when there is nothing to ground an answer on.
pub const NO_CONTEXT_ANSWER: &str =
    "I could not find any relevant information in the indexed documents.";

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] MemoryError),

    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("web search failed: {0}")]
    WebSearch(#[from] ToolError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RagAnswer {
    pub answer: String,
    /// Distinct `source` values (or result URLs for web answers), in retrieval order.
    pub sources: Vec<String>,
}

/// Retrieve, build context, ask the model.
pub struct RagChain<P> {
    provider: P,
    index: DocumentIndex,
    top_k: usize,
    web_search: Option<WebSearchTool>,
}

impl<P: LlmProvider> RagChain<P> {
    pub fn new(provider: P, index: DocumentIndex, top_k: usize) -> Self {
        Self {
            provider,
            index,
            top_k,
            web_search: None,
        }
    }

    /// Fall back to web search when retrieval finds nothing.
    #[must_use]
    pub fn with_web_search(mut self, tool: WebSearchTool) -> Self {
        self.web_search = Some(tool);
        self
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        self.provider.model()
    }

    /// # Errors
    ///
    /// Returns an error if retrieval, the web fallback, or the LLM call fails.
    pub async fn query(&self, question: &str) -> Result<RagAnswer, RagError> {
        let hits = self.index.similarity_search(question, self.top_k).await?;

        let (context, sources) = if hits.is_empty() {
            let Some(tool) = &self.web_search else {
                return Ok(RagAnswer {
                    answer: NO_CONTEXT_ANSWER.to_owned(),
                    sources: Vec::new(),
                });
            };
            tracing::info!("no indexed context, falling back to web search");
            let search = tool.search_with_context(question).await?;
            let sources: Vec<String> = search
                .results
                .urls()
                .into_iter()
                .map(str::to_owned)
                .collect();
            (search.formatted, sources)
        } else {
            (build_context(&hits), collect_sources(&hits))
        };

        let messages = [
            Message::system(format!("{SYSTEM_PROMPT}\n\nContext:\n{context}")),
            Message::user(question),
        ];
        let answer = self.provider.chat(&messages).await?;
        tracing::debug!(
            provider = self.provider.name(),
            sources = sources.len(),
            "answered query"
        );

        Ok(RagAnswer { answer, sources })
    }
}

fn build_context(hits: &[ScoredChunk]) -> String {
    hits.iter()
        .map(|hit| hit.chunk.content())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn collect_sources(hits: &[ScoredChunk]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for source in hits.iter().filter_map(|hit| hit.chunk.source()) {
        if !sources.iter().any(|s| s == source) {
            sources.push(source.to_owned());
        }
    }
    sources
}
