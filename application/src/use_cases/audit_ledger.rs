//! Per-run audit ledger.
//!
//! The single place where audit records are created. Folding and the
//! explicit log tool both go through [`AuditLedger::ensure_recorded`], so an
//! (actor, source) pair yields exactly one acknowledged record per run no
//! matter which path reaches it first.

use crate::ports::audit_sink::{AuditError, AuditSink};
use crate::ports::clock::{Clock, IdGenerator};
use archivist_domain::audit::{AuditAction, AuditKey, AuditReceipt, AuditRecord};
use archivist_domain::retrieval::SensitivityLabel;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Retry policy for audit writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditRetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for AuditRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(100),
        }
    }
}

#[derive(Default)]
struct LedgerState {
    recorded: HashMap<AuditKey, AuditRecord>,
    emitted: Vec<String>,
}

pub struct AuditLedger {
    run_id: String,
    sink: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    policy: AuditRetryPolicy,
    // Held across the sink write: two paths racing on the same key must not
    // both write.
    state: Mutex<LedgerState>,
}

impl AuditLedger {
    pub fn new(
        run_id: impl Into<String>,
        sink: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        policy: AuditRetryPolicy,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            sink,
            clock,
            ids,
            policy,
            state: Mutex::new(LedgerState::default()),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Record an access unless this actor already has one for the source.
    ///
    /// Returns once the sink has acknowledged the record. The record id and
    /// timestamp are fixed before the first attempt and reused on retries.
    pub async fn ensure_recorded(
        &self,
        actor: &str,
        source_id: &str,
        sensitivity_label: &SensitivityLabel,
        action: AuditAction,
    ) -> Result<AuditReceipt, AuditError> {
        let key = AuditKey::new(actor, source_id);
        let mut state = self.state.lock().await;

        if let Some(existing) = state.recorded.get(&key) {
            debug!(run_id = %self.run_id, source_id, "access already recorded");
            return Ok(AuditReceipt::from_record(existing, false));
        }

        let record = AuditRecord {
            id: self.ids.audit_id(),
            timestamp: self.clock.now(),
            actor: actor.to_string(),
            source_id: source_id.to_string(),
            sensitivity_label: sensitivity_label.clone(),
            action,
            run_id: self.run_id.clone(),
        };

        self.write_with_retry(&record).await?;

        info!(
            run_id = %self.run_id,
            audit_id = %record.id,
            source_id,
            label = %record.sensitivity_label,
            "audit record acknowledged"
        );
        let receipt = AuditReceipt::from_record(&record, true);
        state.emitted.push(record.id.clone());
        state.recorded.insert(key, record);
        Ok(receipt)
    }

    async fn write_with_retry(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.sink.record(record).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < max_attempts => {
                    warn!(
                        audit_id = %record.id,
                        attempt,
                        max_attempts,
                        error = %e,
                        "audit write failed, retrying"
                    );
                    tokio::time::sleep(self.policy.backoff.saturating_mul(attempt)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Acknowledged record ids, in emission order
    pub async fn emitted_ids(&self) -> Vec<String> {
        self.state.lock().await.emitted.clone()
    }

    pub async fn is_recorded(&self, actor: &str, source_id: &str) -> bool {
        self.state
            .lock()
            .await
            .recorded
            .contains_key(&AuditKey::new(actor, source_id))
    }
}
