//! Tool Registry
//!
//! The [`ToolRegistry`] maps tool names to a closed set of handlers and
//! implements [`ToolExecutorPort`]. Every call is checked against its
//! declared parameters before a handler runs.
//!
//! # Usage
//!
//! ```ignore
//! let mut registry = ToolRegistry::new();
//! registry.register(
//!     search_definition(&manuals),
//!     ToolHandler::Search(SearchTool::new(gateway, "manual")),
//! )?;
//! registry.register(log_access_definition(&levels), ToolHandler::Log(AccessLogTool::new()))?;
//!
//! let result = registry.dispatch(&call, &ctx).await;
//! ```

use super::access_log::AccessLogTool;
use super::search::SearchTool;
use archivist_application::{DispatchContext, ToolExecutorPort};
use archivist_domain::{
    DefaultToolValidator, ToolCall, ToolCapability, ToolDefinition, ToolError, ToolResult,
    ToolSpec, ToolValidator,
};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Handler variants a tool can be bound to
pub enum ToolHandler {
    Search(SearchTool),
    Log(AccessLogTool),
}

impl ToolHandler {
    pub fn capability(&self) -> ToolCapability {
        match self {
            ToolHandler::Search(_) => ToolCapability::Search,
            ToolHandler::Log(_) => ToolCapability::Log,
        }
    }

    async fn run(&self, call: &ToolCall, ctx: &DispatchContext) -> ToolResult {
        match self {
            ToolHandler::Search(tool) => tool.run(call, ctx).await,
            ToolHandler::Log(tool) => tool.run(call, ctx).await,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool already registered: {0}")]
    Duplicate(String),

    #[error("tool '{tool}' is declared as {declared} but bound to a {handler} handler")]
    CapabilityMismatch {
        tool: String,
        declared: ToolCapability,
        handler: ToolCapability,
    },
}

/// Registry of named tools and their handlers
#[derive(Default)]
pub struct ToolRegistry {
    spec: ToolSpec,
    handlers: HashMap<String, ToolHandler>,
    validator: DefaultToolValidator,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a definition to a handler.
    ///
    /// The handler variant must match the definition's capability.
    pub fn register(
        &mut self,
        definition: ToolDefinition,
        handler: ToolHandler,
    ) -> Result<(), RegistryError> {
        if definition.capability != handler.capability() {
            return Err(RegistryError::CapabilityMismatch {
                tool: definition.name,
                declared: definition.capability,
                handler: handler.capability(),
            });
        }
        let name = definition.name.clone();
        if !self.spec.insert(definition) {
            return Err(RegistryError::Duplicate(name));
        }
        debug!(tool = %name, capability = %handler.capability(), "registered tool");
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Validate and run one call. Failures come back as error results.
    pub async fn dispatch(&self, call: &ToolCall, ctx: &DispatchContext) -> ToolResult {
        let (Some(definition), Some(handler)) = (
            self.spec.get(&call.tool_name),
            self.handlers.get(&call.tool_name),
        ) else {
            debug!(tool = %call.tool_name, run_id = %ctx.run_id, "unknown tool requested");
            return ToolResult::failure(&call.tool_name, ToolError::unknown_tool(&call.tool_name));
        };

        if let Err(message) = self.validator.validate(call, definition) {
            debug!(
                tool = %call.tool_name,
                correlation_id = %call.correlation_id,
                %message,
                "tool arguments rejected"
            );
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(message));
        }

        handler.run(call, ctx).await
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall, ctx: &DispatchContext) -> ToolResult {
        self.dispatch(call, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::catalog::{log_access_definition, search_definition};
    use crate::tools::search::tests::{StubGateway, context};
    use crate::config::FileToolsConfig;
    use archivist_domain::{RetrievedRecord, ToolParameter};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn levels() -> Vec<String> {
        ["unclassified", "confidential", "secret", "top_secret"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn registry(gateway: Arc<StubGateway>) -> ToolRegistry {
        let manuals = &FileToolsConfig::default().search[0];
        let mut registry = ToolRegistry::new();
        registry
            .register(
                search_definition(manuals),
                ToolHandler::Search(
                    SearchTool::new(gateway, &manuals.source_kind)
                        .with_category_param(manuals.category_param.clone()),
                ),
            )
            .unwrap();
        registry
            .register(log_access_definition(&levels()), ToolHandler::Log(AccessLogTool::new()))
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn test_dispatch_search() {
        let gateway = Arc::new(StubGateway::with_records(vec![RetrievedRecord::new(
            "TM-9-2320",
            "p. 4",
            "unclassified",
            0.8,
            "Torque to 55 ft-lb.",
        )]));
        let registry = registry(gateway);

        let call = ToolCall::new("search_manuals").with_arg("query", "torque");
        let result = registry.execute(&call, &context(None)).await;

        assert!(result.is_success());
        assert_eq!(result.records().len(), 1);
        assert!(registry.has_tool("log_access"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = registry(Arc::new(StubGateway::default()));

        let call = ToolCall::new("search_unknown").with_arg("query", "x");
        let result = registry.dispatch(&call, &context(None)).await;

        assert!(!result.is_success());
        assert!(result.error().unwrap().is_unknown_tool());
    }

    #[tokio::test]
    async fn test_validation_failure_skips_handler() {
        let gateway = Arc::new(StubGateway::default());
        let registry = registry(gateway.clone());

        let bad_enum = ToolCall::new("search_manuals")
            .with_arg("query", "torque")
            .with_arg("manual_type", "cooking");
        let missing = ToolCall::new("search_manuals");
        let unknown_arg = ToolCall::new("search_manuals")
            .with_arg("query", "torque")
            .with_arg("user_id", "someone-else");
        let ctx = context(None);

        for call in [bad_enum, missing, unknown_arg] {
            let result = registry.dispatch(&call, &ctx).await;
            assert!(result.error().unwrap().is_validation(), "{call:?}");
        }
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_log_level_must_be_known() {
        let registry = registry(Arc::new(StubGateway::default()));
        let ctx = context(None);

        let call = ToolCall::new("log_access")
            .with_arg("document_id", "FM-3-21")
            .with_arg("classification_level", "cosmic");
        let result = registry.dispatch(&call, &ctx).await;

        assert!(result.error().unwrap().is_validation());
        assert!(ctx.ledger.emitted_ids().await.is_empty());
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = registry(Arc::new(StubGateway::default()));
        let err = registry
            .register(log_access_definition(&levels()), ToolHandler::Log(AccessLogTool::new()))
            .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("log_access".to_string()));
    }

    #[test]
    fn test_register_capability_mismatch() {
        let mut registry = ToolRegistry::new();
        let definition = ToolDefinition::new("search_misc", "Search", ToolCapability::Search)
            .with_parameter(ToolParameter::new("query", "Query", true));
        let err = registry
            .register(definition, ToolHandler::Log(AccessLogTool::new()))
            .unwrap_err();
        assert!(matches!(err, RegistryError::CapabilityMismatch { .. }));
        assert!(registry.tool_spec().is_empty());
    }
}
