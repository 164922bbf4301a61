//! Audit trail configuration from TOML (`[audit]` section)

use archivist_application::AuditRetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// Directory holding the daily `audit_log_YYYYMMDD.jsonl` files
    pub dir: PathBuf,
    /// Attempts per record before the run fails
    pub max_attempts: u32,
    /// Delay before the second attempt; grows linearly
    pub backoff_ms: u64,
}

impl Default for FileAuditConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("audit_logs"),
            max_attempts: 3,
            backoff_ms: 100,
        }
    }
}

impl FileAuditConfig {
    pub fn retry_policy(&self) -> AuditRetryPolicy {
        AuditRetryPolicy {
            max_attempts: self.max_attempts,
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}
