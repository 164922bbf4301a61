//! Tool domain value objects — immutable result and error types
//!
//! Every dispatch produces a [`ToolResult`], including failed ones: errors are
//! values that get folded back into the conversation so the reasoning model
//! can see them and decide what to do next.

use crate::audit::entities::AuditReceipt;
use crate::retrieval::entities::RetrievedRecord;
use serde::{Deserialize, Serialize};

/// Error that occurred while dispatching a tool call.
///
/// | Code | Folded? | Description |
/// |------|---------|-------------|
/// | `NOT_FOUND` | Yes | Unknown tool name |
/// | `INVALID_ARGUMENT` | Yes | Schema validation failed; handler not invoked |
/// | `TRANSPORT` | Yes | Collaborator unreachable after the tool's own retries |
/// | `TIMEOUT` | Yes | Tool call exceeded its deadline |
/// | `EXECUTION_FAILED` | Yes | Any other handler failure |
/// | `AUDIT_WRITE_FAILED` | No | The log tool could not persist its record; fatal for the run |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "INVALID_ARGUMENT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub const NOT_FOUND: &'static str = "NOT_FOUND";
    pub const INVALID_ARGUMENT: &'static str = "INVALID_ARGUMENT";
    pub const TRANSPORT: &'static str = "TRANSPORT";
    pub const TIMEOUT: &'static str = "TIMEOUT";
    pub const EXECUTION_FAILED: &'static str = "EXECUTION_FAILED";
    pub const AUDIT_WRITE_FAILED: &'static str = "AUDIT_WRITE_FAILED";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::new(Self::NOT_FOUND, format!("unknown tool: {}", name.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Self::INVALID_ARGUMENT, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(Self::TRANSPORT, message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(Self::EXECUTION_FAILED, message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            Self::TIMEOUT,
            format!("Operation timed out: {}", operation.into()),
        )
    }

    pub fn audit_write_failed(message: impl Into<String>) -> Self {
        Self::new(Self::AUDIT_WRITE_FAILED, message)
    }

    pub fn is_validation(&self) -> bool {
        self.code == Self::INVALID_ARGUMENT
    }

    pub fn is_unknown_tool(&self) -> bool {
        self.code == Self::NOT_FOUND
    }

    pub fn is_audit_failure(&self) -> bool {
        self.code == Self::AUDIT_WRITE_FAILED
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Structured payload produced by a tool handler
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ToolPayload {
    /// Ranked records from a search tool, in retrieval order
    Records(Vec<RetrievedRecord>),
    /// Confirmation from the log tool
    Receipt(AuditReceipt),
    #[default]
    Empty,
}

/// Result of a tool dispatch, carrying a payload or error information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Correlation id of the request this result answers
    pub correlation_id: String,
    /// Name of the tool that was executed
    pub tool_name: String,
    #[serde(default)]
    pub payload: ToolPayload,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Number of attempts the handler made against its collaborator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
    /// Records removed before folding because the context budget was spent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped_records: Option<usize>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, payload: ToolPayload) -> Self {
        Self {
            correlation_id: String::new(),
            tool_name: tool_name.into(),
            payload,
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            correlation_id: String::new(),
            tool_name: tool_name.into(),
            payload: ToolPayload::Empty,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.metadata.attempts = Some(attempts);
        self
    }

    /// Check if execution was successful
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Get the error
    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Records carried by this result (empty for receipts and errors)
    pub fn records(&self) -> &[RetrievedRecord] {
        match &self.payload {
            ToolPayload::Records(records) => records,
            _ => &[],
        }
    }

    /// Render the result as the JSON text the reasoning model sees.
    pub fn render(&self) -> String {
        let value = if let Some(error) = &self.error {
            serde_json::json!({
                "success": false,
                "error": { "code": error.code, "message": error.message },
            })
        } else {
            match &self.payload {
                ToolPayload::Records(records) => serde_json::Value::Array(
                    records
                        .iter()
                        .enumerate()
                        .map(|(i, r)| {
                            serde_json::json!({
                                "rank": i + 1,
                                "source_id": r.source_id,
                                "location": r.location,
                                "sensitivity_label": r.sensitivity_label,
                                "relevance_score": r.score,
                                "text": r.excerpt,
                            })
                        })
                        .collect(),
                ),
                ToolPayload::Receipt(receipt) => serde_json::json!({
                    "success": true,
                    "audit_id": receipt.audit_id,
                    "timestamp": receipt.timestamp.to_rfc3339(),
                    "message": format!(
                        "Access to {} document {} logged",
                        receipt.sensitivity_label, receipt.source_id
                    ),
                }),
                ToolPayload::Empty => serde_json::json!({ "success": true }),
            }
        };
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error() {
        let err = ToolError::unknown_tool("search_unknown").with_details("not registered");

        assert_eq!(err.code, "NOT_FOUND");
        assert!(err.is_unknown_tool());
        assert!(err.message.contains("search_unknown"));
        assert_eq!(
            err.to_string(),
            "[NOT_FOUND] unknown tool: search_unknown (not registered)"
        );
    }

    #[test]
    fn test_tool_result_success() {
        let record = RetrievedRecord::new("TM-1", "p. 3", "unclassified", 0.9, "text");
        let result = ToolResult::success("search_manuals", ToolPayload::Records(vec![record]))
            .with_correlation_id("call_1");

        assert!(result.is_success());
        assert_eq!(result.records().len(), 1);
        assert_eq!(result.correlation_id, "call_1");
    }

    #[test]
    fn test_tool_result_failure() {
        let result = ToolResult::failure("search_manuals", ToolError::invalid_argument("bad"));

        assert!(!result.is_success());
        assert!(result.records().is_empty());
        assert!(result.error().unwrap().is_validation());
    }

    #[test]
    fn test_render_records() {
        let record = RetrievedRecord::new("TM-1", "p. 3", "SECRET", 0.75, "excerpt");
        let result = ToolResult::success("search_manuals", ToolPayload::Records(vec![record]));
        let rendered: serde_json::Value = serde_json::from_str(&result.render()).unwrap();

        assert_eq!(rendered[0]["rank"], 1);
        assert_eq!(rendered[0]["source_id"], "TM-1");
        assert_eq!(rendered[0]["sensitivity_label"], "SECRET");
        assert_eq!(rendered[0]["relevance_score"], 0.75);
    }

    #[test]
    fn test_render_error() {
        let result = ToolResult::failure("x", ToolError::unknown_tool("x"));
        let rendered: serde_json::Value = serde_json::from_str(&result.render()).unwrap();
        assert_eq!(rendered["success"], false);
        assert_eq!(rendered["error"]["code"], "NOT_FOUND");
    }
}
