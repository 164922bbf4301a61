//! Output formatter trait

use archivist_application::AgentError;
use archivist_domain::{AuditRecord, RunResult};

/// Trait for rendering run outcomes and audit listings
pub trait OutputFormatter {
    /// Answer, citations and run summary
    fn format(&self, result: &RunResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &RunResult) -> String;

    /// Fatal run error with its context
    fn format_error(&self, error: &AgentError) -> String;

    /// Audit records, one per line
    fn format_audit(&self, records: &[AuditRecord]) -> String;
}
