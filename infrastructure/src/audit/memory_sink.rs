//! In-memory audit sink.
//!
//! Holds records for the lifetime of the process. Used for dry runs and by
//! the end-to-end tests.

use archivist_application::{AuditError, AuditSink};
use archivist_domain::{AuditFilter, AuditRecord};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record written so far, in write order
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| AuditError::Unavailable("audit store lock poisoned".to_string()))?;
        records.push(record.clone());
        Ok(())
    }

    async fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditRecord>, AuditError> {
        let records = self
            .records
            .lock()
            .map_err(|_| AuditError::Read("audit store lock poisoned".to_string()))?;
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }
}
