//! Tool executor port
//!
//! Defines how the orchestrator dispatches tool calls. The concrete registry
//! lives in the infrastructure layer.

use crate::use_cases::audit_ledger::AuditLedger;
use archivist_domain::retrieval::SensitivityLabel;
use archivist_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Per-run context handed to every tool call.
///
/// Carries the run's actor and clearance so handlers never take them from
/// model-supplied arguments, and the run's audit ledger so explicit log
/// requests share deduplication with folding.
#[derive(Clone)]
pub struct DispatchContext {
    pub run_id: String,
    pub actor: String,
    pub clearance: Option<SensitivityLabel>,
    pub ledger: Arc<AuditLedger>,
}

/// Port for tool execution
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get(name).is_some()
    }

    /// Definitions sent to the reasoning model, sorted by name
    fn definitions(&self) -> Vec<ToolDefinition> {
        self.tool_spec().sorted().into_iter().cloned().collect()
    }

    /// Execute a tool call. Failures are returned as error results, never thrown.
    async fn execute(&self, call: &ToolCall, ctx: &DispatchContext) -> ToolResult;
}
