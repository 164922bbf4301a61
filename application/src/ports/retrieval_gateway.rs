//! Retrieval gateway port
//!
//! Ranked passages for a query string plus filters. Ranking, embedding and
//! storage all live behind this port.

use archivist_domain::retrieval::{RetrievedRecord, SearchFilters};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("retrieval transport error: {0}")]
    Transport(String),

    #[error("retrieval backend error: {0}")]
    Backend(String),

    #[error("invalid retrieval request: {0}")]
    InvalidRequest(String),
}

impl RetrievalError {
    /// Transport failures may succeed on retry; the others will not
    pub fn is_transient(&self) -> bool {
        matches!(self, RetrievalError::Transport(_))
    }
}

/// Gateway to the retrieval collaborator.
///
/// Implementations must return records in rank order and must not rewrite
/// source ids or sensitivity labels.
#[async_trait]
pub trait RetrievalGateway: Send + Sync {
    async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        top_k: usize,
    ) -> Result<Vec<RetrievedRecord>, RetrievalError>;
}
