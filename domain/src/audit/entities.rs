//! Audit entities

use crate::retrieval::sensitivity::SensitivityLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of access an audit record documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A restricted record was folded into the model's context
    DocumentAccess,
    /// The model explicitly asked for an access to be logged
    AccessLogged,
}

impl AuditAction {
    pub fn as_str(&self) -> &str {
        match self {
            AuditAction::DocumentAccess => "DOCUMENT_ACCESS",
            AuditAction::AccessLogged => "ACCESS_LOGGED",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable compliance record.
///
/// Serialized as one JSON line with `id`, `timestamp` (RFC3339), `actor`,
/// `source_id`, `sensitivity_label`, `action` and `run_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub source_id: String,
    pub sensitivity_label: SensitivityLabel,
    pub action: AuditAction,
    pub run_id: String,
}

impl AuditRecord {
    pub fn key(&self) -> AuditKey {
        AuditKey::new(&self.actor, &self.source_id)
    }
}

/// Deduplication key: one record per actor and source within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AuditKey {
    pub actor: String,
    pub source_id: String,
}

impl AuditKey {
    pub fn new(actor: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            source_id: source_id.into(),
        }
    }
}

/// Confirmation handed back to the model by the `log_access` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReceipt {
    pub audit_id: String,
    pub timestamp: DateTime<Utc>,
    pub source_id: String,
    pub sensitivity_label: SensitivityLabel,
    /// False when the access had already been recorded earlier in the run
    pub newly_recorded: bool,
}

impl AuditReceipt {
    pub fn from_record(record: &AuditRecord, newly_recorded: bool) -> Self {
        Self {
            audit_id: record.id.clone(),
            timestamp: record.timestamp,
            source_id: record.source_id.clone(),
            sensitivity_label: record.sensitivity_label.clone(),
            newly_recorded,
        }
    }
}

/// Read-side filter used by compliance tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    pub actor: Option<String>,
    pub source_id: Option<String>,
    pub sensitivity_label: Option<String>,
    pub run_id: Option<String>,
    pub since: Option<DateTime<Utc>>,
}

impl AuditFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.sensitivity_label = Some(label.into());
        self
    }

    pub fn with_run(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn matches(&self, record: &AuditRecord) -> bool {
        self.actor.as_ref().is_none_or(|a| a == &record.actor)
            && self.source_id.as_ref().is_none_or(|s| s == &record.source_id)
            && self
                .sensitivity_label
                .as_ref()
                .is_none_or(|l| l.eq_ignore_ascii_case(record.sensitivity_label.as_str()))
            && self.run_id.as_ref().is_none_or(|r| r == &record.run_id)
            && self.since.is_none_or(|t| record.timestamp >= t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> AuditRecord {
        AuditRecord {
            id: "aud-1".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            actor: "analyst-7".to_string(),
            source_id: "TM-9-2320".to_string(),
            sensitivity_label: SensitivityLabel::new("SECRET"),
            action: AuditAction::DocumentAccess,
            run_id: "run-1".to_string(),
        }
    }

    #[test]
    fn test_record_serializes_persisted_shape() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(value["id"], "aud-1");
        assert_eq!(value["timestamp"], "2026-03-01T12:00:00Z");
        assert_eq!(value["actor"], "analyst-7");
        assert_eq!(value["source_id"], "TM-9-2320");
        assert_eq!(value["sensitivity_label"], "SECRET");
        assert_eq!(value["action"], "DOCUMENT_ACCESS");
    }

    #[test]
    fn test_filter_matches() {
        let r = record();
        assert!(AuditFilter::new().matches(&r));
        assert!(AuditFilter::new().with_actor("analyst-7").matches(&r));
        assert!(AuditFilter::new().with_label("secret").matches(&r));
        assert!(!AuditFilter::new().with_source("other").matches(&r));
        assert!(
            !AuditFilter::new()
                .with_since(Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap())
                .matches(&r)
        );
    }

    #[test]
    fn test_receipt_from_record() {
        let receipt = AuditReceipt::from_record(&record(), false);
        assert_eq!(receipt.audit_id, "aud-1");
        assert!(!receipt.newly_recorded);
    }
}
