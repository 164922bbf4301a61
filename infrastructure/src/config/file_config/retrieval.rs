//! Retrieval configuration from TOML (`[retrieval]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    /// JSON or JSON-lines file of indexed passages
    pub corpus_path: PathBuf,
    /// Records requested per search
    pub top_k: usize,
    /// Excerpts longer than this are cut and suffixed with "..."
    pub max_excerpt_chars: usize,
    /// Extra attempts after a transient retrieval failure
    pub transport_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from("corpus.jsonl"),
            top_k: 5,
            max_excerpt_chars: 500,
            transport_retries: 1,
            retry_backoff_ms: 200,
        }
    }
}
