use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use sift_core::bootstrap;
use sift_core::{RagChain, Settings};
use sift_llm::provider::embed_fn;
use sift_memory::document::{
    Document, DocumentProcessor, Metadata, MetadataValue, SplitterConfig,
};
use sift_memory::{DocumentIndex, InMemoryVectorStore, VectorStore};

use crate::samples;

const PREVIEW_CHARS: usize = 150;

pub fn chunk(file: Option<PathBuf>, chunk_size: usize, chunk_overlap: usize) -> anyhow::Result<()> {
    let path = if let Some(path) = file {
        path
    } else {
        std::fs::write(samples::SAMPLE_DOCUMENT_PATH, samples::SAMPLE_DOCUMENT)
            .with_context(|| format!("failed to write {}", samples::SAMPLE_DOCUMENT_PATH))?;
        println!("Created {}", samples::SAMPLE_DOCUMENT_PATH);
        PathBuf::from(samples::SAMPLE_DOCUMENT_PATH)
    };

    let processor = DocumentProcessor::new(SplitterConfig::new(chunk_size, chunk_overlap))?;
    println!("Processor configured (chunk_size={chunk_size}, chunk_overlap={chunk_overlap})");

    let chunks = processor
        .process(&path)
        .with_context(|| format!("failed to process {}", path.display()))?;
    println!("Document split into {} chunks", chunks.len());

    for (i, chunk) in chunks.iter().enumerate() {
        println!("\n-- chunk {}", i + 1);
        println!("Content: {}", preview(chunk.content()));
        println!("Length: {}", chunk.content().chars().count());
        println!("Metadata: {}", format_metadata(chunk.metadata()));
    }
    Ok(())
}

pub async fn ingest(settings: &Settings, path: &Path) -> anyhow::Result<()> {
    settings.validate()?;

    let processor = DocumentProcessor::new(settings.splitter_config())?;
    let chunks = processor
        .process(path)
        .with_context(|| format!("failed to process {}", path.display()))?;

    let store = bootstrap::open_store(&settings.index.path)?;
    let index = embedding_index(settings, Arc::clone(&store));
    let count = index.create_from_documents(&chunks).await?;
    store
        .save(&settings.index.path)
        .with_context(|| format!("failed to save {}", settings.index.path.display()))?;

    println!(
        "Indexed {count} chunks from {} into {}",
        path.display(),
        settings.index.path.display()
    );
    Ok(())
}

pub async fn ask(settings: &Settings, question: &str, web: bool) -> anyhow::Result<()> {
    settings.validate()?;

    let store = bootstrap::open_store(&settings.index.path)?;
    let index = embedding_index(settings, store);
    if index.is_empty().await? && !web {
        tracing::warn!("index is empty, run `sift ingest <PATH>` first or pass --web");
    }

    let mut rag = RagChain::new(
        bootstrap::chat_provider(settings)?,
        index,
        settings.index.top_k,
    );
    if web {
        rag = rag.with_web_search(bootstrap::web_search_tool(settings)?);
    }

    let answer = rag.query(question).await?;
    println!("{}", answer.answer);
    if !answer.sources.is_empty() {
        println!("\nSources:");
        for source in &answer.sources {
            println!("  - {source}");
        }
    }
    Ok(())
}

pub async fn demo(settings: &Settings) -> anyhow::Result<()> {
    settings.validate()?;

    println!("Step 1: creating knowledge base");
    let processor = DocumentProcessor::new(settings.splitter_config())?;
    let documents: Vec<Document> = samples::KNOWLEDGE_BASE
        .iter()
        .map(|(source, content)| {
            let metadata = Metadata::from([("source".to_owned(), MetadataValue::from(*source))]);
            Document::new(*content, metadata)
        })
        .collect();
    println!("Created {} documents", documents.len());

    println!("\nStep 2: indexing");
    let chunks = processor.split_documents(&documents);
    let index = embedding_index(settings, Arc::new(InMemoryVectorStore::new()));
    let count = index.create_from_documents(&chunks).await?;
    println!("Indexed {count} chunks");

    println!("\nStep 3: initializing answer chain");
    let rag = RagChain::new(
        bootstrap::chat_provider(settings)?,
        index,
        settings.index.top_k,
    );
    println!("LLM model: {}", rag.model_name());

    println!("\nStep 4: document-only queries");
    for (i, question) in samples::DEMO_QUESTIONS.iter().enumerate() {
        println!("\nQuery {}: '{question}'", i + 1);
        let answer = rag.query(question).await?;
        println!("Answer: {}", preview(&answer.answer));
        println!("Sources: {:?}", answer.sources);
    }

    println!("\nStep 5: web search");
    let tool = bootstrap::web_search_tool(settings)?;
    println!("{}", tool.search(samples::DEMO_WEB_QUERY).await?);
    Ok(())
}

pub async fn search(settings: &Settings, query: &str) -> anyhow::Result<()> {
    settings.validate()?;
    let tool = bootstrap::web_search_tool(settings)?;
    println!("{}", tool.search(query).await?);
    Ok(())
}

fn embedding_index(settings: &Settings, store: Arc<InMemoryVectorStore>) -> DocumentIndex {
    let provider = Arc::new(bootstrap::embedding_provider(settings));
    DocumentIndex::new(store as Arc<dyn VectorStore>, embed_fn(provider))
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().nth(PREVIEW_CHARS).is_some() {
        out.push_str("...");
    }
    out
}

fn format_metadata(metadata: &Metadata) -> String {
    let mut out = String::from("{");
    for (i, (key, value)) in metadata.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{key}: {value}");
    }
    out.push('}');
    out
}
