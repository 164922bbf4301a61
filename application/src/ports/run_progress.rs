//! Run progress port.
//!
//! [`RunProgressNotifier`] is an output port the presentation layer
//! implements to show a run as it happens. All methods have default no-op
//! implementations, so implementers only override what they display.

use archivist_domain::{AuditReceipt, RunPhase, RunResult, ToolCall, ToolResult};

pub trait RunProgressNotifier: Send + Sync {
    /// Called when the loop enters a phase of the given step
    fn on_phase_change(&self, _step: usize, _phase: RunPhase) {}

    /// Called before a reasoning call is retried
    fn on_reasoning_retry(&self, _retry: u32, _max_retries: u32, _error: &str) {}

    /// Called when a malformed reply is answered with a corrective note
    fn on_corrective_note(&self, _reason: &str) {}

    /// Called when a tool call is dispatched
    fn on_tool_call(&self, _call: &ToolCall) {}

    /// Called when a tool result is folded
    fn on_tool_result(&self, _result: &ToolResult) {}

    /// Called when the context budget drops records from a result
    fn on_records_dropped(&self, _tool_name: &str, _dropped: usize) {}

    /// Called when the audit ledger acknowledges a new record
    fn on_audit_recorded(&self, _receipt: &AuditReceipt) {}

    /// Called once with the final result
    fn on_complete(&self, _result: &RunResult) {}
}

/// No-op notifier for callers that do not report progress
pub struct NoRunProgress;

impl RunProgressNotifier for NoRunProgress {}
