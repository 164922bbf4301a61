//! Tool definitions and registry assembly from configuration

use super::access_log::AccessLogTool;
use super::registry::{RegistryError, ToolHandler, ToolRegistry};
use super::search::SearchTool;
use super::LOG_ACCESS_TOOL;
use crate::config::{FileConfig, FileSearchToolConfig};
use archivist_application::RetrievalGateway;
use archivist_domain::{ToolCapability, ToolDefinition, ToolParameter};
use std::sync::Arc;
use std::time::Duration;

pub fn search_definition(config: &FileSearchToolConfig) -> ToolDefinition {
    let mut definition =
        ToolDefinition::new(&config.name, &config.description, ToolCapability::Search)
            .with_parameter(ToolParameter::new(
                "query",
                "The search query describing what information to find",
                true,
            ));

    if let Some(param) = &config.category_param {
        let description = format!("Optional filter for {}", param.replace('_', " "));
        definition = definition.with_parameter(
            ToolParameter::new(param, description, false)
                .with_allowed_values(config.categories.iter().cloned()),
        );
    }
    definition
}

/// Definition of the explicit access logging tool.
///
/// There is no actor parameter: the run's actor is always used.
pub fn log_access_definition(levels: &[String]) -> ToolDefinition {
    ToolDefinition::new(
        LOG_ACCESS_TOOL,
        "Logs access to classified documents for audit trail and compliance. Call this when \
         relying on any document above the lowest classification level. Creates a permanent \
         audit record with timestamp and unique audit ID.",
        ToolCapability::Log,
    )
    .with_parameter(ToolParameter::new(
        "document_id",
        "Identifier of the accessed document (the source id from search results)",
        true,
    ))
    .with_parameter(
        ToolParameter::new(
            "classification_level",
            "Classification level of the accessed document",
            true,
        )
        .with_allowed_values(levels.iter().cloned()),
    )
}

/// Build the registry described by the `[tools]` and `[retrieval]` sections
pub fn build_registry(
    config: &FileConfig,
    gateway: Arc<dyn RetrievalGateway>,
) -> Result<ToolRegistry, RegistryError> {
    let retrieval = &config.retrieval;
    let mut registry = ToolRegistry::new();

    for search in &config.tools.search {
        let tool = SearchTool::new(Arc::clone(&gateway), &search.source_kind)
            .with_category_param(search.category_param.clone())
            .with_top_k(retrieval.top_k)
            .with_max_excerpt_chars(retrieval.max_excerpt_chars)
            .with_retries(
                retrieval.transport_retries,
                Duration::from_millis(retrieval.retry_backoff_ms),
            );
        registry.register(search_definition(search), ToolHandler::Search(tool))?;
    }

    if config.tools.log_access {
        registry.register(
            log_access_definition(&config.sensitivity.levels),
            ToolHandler::Log(AccessLogTool::new()),
        )?;
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::search::tests::StubGateway;
    use archivist_application::ToolExecutorPort;

    #[test]
    fn test_default_catalog() {
        let registry = build_registry(&FileConfig::default(), Arc::new(StubGateway::default()))
            .unwrap();

        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["log_access", "search_doctrine", "search_manuals"]);

        let manuals = registry.tool_spec().get("search_manuals").unwrap();
        let manual_type = manuals.parameter("manual_type").unwrap();
        assert!(!manual_type.required);
        assert_eq!(
            manual_type.allowed_values,
            vec!["maintenance", "safety", "operations", "training"]
        );

        let log = registry.tool_spec().get("log_access").unwrap();
        assert!(log.parameter("user_id").is_none());
        assert_eq!(
            log.parameter("classification_level").unwrap().allowed_values.len(),
            4
        );
    }

    #[test]
    fn test_log_access_can_be_disabled() {
        let mut config = FileConfig::default();
        config.tools.log_access = false;
        let registry = build_registry(&config, Arc::new(StubGateway::default())).unwrap();
        assert!(!registry.has_tool("log_access"));
        assert_eq!(registry.tool_spec().len(), 2);
    }

    #[test]
    fn test_search_without_category() {
        let config = FileSearchToolConfig {
            name: "search_policies".to_string(),
            description: "Search policies".to_string(),
            source_kind: "policy".to_string(),
            category_param: None,
            categories: vec![],
        };
        let definition = search_definition(&config);
        assert_eq!(definition.parameters.len(), 1);
        assert_eq!(definition.capability, ToolCapability::Search);
    }
}
