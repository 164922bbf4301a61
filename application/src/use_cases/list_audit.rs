//! List audit records for compliance review.

use crate::ports::audit_sink::{AuditError, AuditSink};
use archivist_domain::audit::{AuditFilter, AuditRecord};
use std::sync::Arc;
use tracing::debug;

pub struct ListAuditUseCase {
    sink: Arc<dyn AuditSink>,
}

impl ListAuditUseCase {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Records matching `filter`, oldest first.
    pub async fn execute(&self, filter: &AuditFilter) -> Result<Vec<AuditRecord>, AuditError> {
        let mut records = self.sink.query(filter).await?;
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        debug!(count = records.len(), "audit records listed");
        Ok(records)
    }
}
