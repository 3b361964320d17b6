//! Settings, provider bootstrap, and the answer chain that ties retrieval to the LLM.

pub mod bootstrap;
pub mod config;
pub mod rag;
pub mod secret;

pub use config::{ConfigError, Settings};
pub use rag::{RagAnswer, RagChain, RagError};
pub use secret::Secret;
