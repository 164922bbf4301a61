//! Explicit access logging tool
//!
//! Writes through the run's audit ledger, so a source already audited by
//! folding is acknowledged with its existing receipt instead of a second
//! record. The actor is always the run's actor.

use archivist_application::DispatchContext;
use archivist_domain::{AuditAction, SensitivityLabel, ToolCall, ToolError, ToolPayload, ToolResult};
use tracing::error;

#[derive(Debug, Clone, Default)]
pub struct AccessLogTool;

impl AccessLogTool {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self, call: &ToolCall, ctx: &DispatchContext) -> ToolResult {
        let (document_id, level) = match (
            call.require_string("document_id"),
            call.require_string("classification_level"),
        ) {
            (Ok(doc), Ok(level)) => (doc, level),
            (Err(e), _) | (_, Err(e)) => {
                return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(e));
            }
        };
        let label = SensitivityLabel::new(level.to_lowercase());

        match ctx
            .ledger
            .ensure_recorded(&ctx.actor, document_id, &label, AuditAction::AccessLogged)
            .await
        {
            Ok(receipt) => ToolResult::success(&call.tool_name, ToolPayload::Receipt(receipt)),
            Err(e) => {
                error!(
                    run_id = %ctx.run_id,
                    source_id = document_id,
                    error = %e,
                    "explicit access log failed"
                );
                ToolResult::failure(&call.tool_name, ToolError::audit_write_failed(e.to_string()))
            }
        }
    }
}
