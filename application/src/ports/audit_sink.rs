//! Audit sink port
//!
//! Append-only persistence for compliance records. This is separate from
//! `tracing`: tracing carries diagnostics, the sink carries the legal record
//! of who was shown what.

use archivist_domain::audit::{AuditFilter, AuditRecord};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),

    #[error("audit write failed: {0}")]
    Write(String),

    #[error("audit record could not be encoded: {0}")]
    Encoding(String),

    #[error("audit read failed: {0}")]
    Read(String),
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one record. `Ok` means the record is durable.
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError>;

    /// Read path for compliance tooling; the orchestrator never calls it.
    async fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditRecord>, AuditError>;
}
