//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agent;
mod audit;
mod output;
mod reasoning;
mod retrieval;
mod tools;

pub use agent::FileAgentConfig;
pub use audit::FileAuditConfig;
pub use output::FileOutputConfig;
pub use reasoning::FileReasoningConfig;
pub use retrieval::FileRetrievalConfig;
pub use tools::{FileSearchToolConfig, FileToolsConfig};

use archivist_application::RunParams;
use archivist_domain::SensitivityPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    ZeroValue(&'static str),

    #[error("tool name cannot be empty")]
    EmptyToolName,

    #[error("duplicate tool name: {0}")]
    DuplicateToolName(String),

    #[error("search tool '{0}' has an empty source_kind")]
    EmptySourceKind(String),

    #[error("sensitivity.levels cannot be empty")]
    NoSensitivityLevels,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Loop budgets, timeouts and retries
    pub agent: FileAgentConfig,
    /// Reasoning endpoint
    pub reasoning: FileReasoningConfig,
    /// Corpus and search behavior
    pub retrieval: FileRetrievalConfig,
    /// Audit trail location and write retries
    pub audit: FileAuditConfig,
    /// Restricted labels and level ordering (uses domain type)
    pub sensitivity: SensitivityPolicy,
    /// Registered tools
    pub tools: FileToolsConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let zero_checks: [(&'static str, bool); 6] = [
            ("agent.max_steps", self.agent.max_steps == 0),
            ("agent.step_timeout_secs", self.agent.step_timeout_secs == 0),
            ("agent.tool_timeout_secs", self.agent.tool_timeout_secs == 0),
            ("audit.max_attempts", self.audit.max_attempts == 0),
            ("retrieval.top_k", self.retrieval.top_k == 0),
            ("retrieval.max_excerpt_chars", self.retrieval.max_excerpt_chars == 0),
        ];
        if let Some((field, _)) = zero_checks.iter().find(|(_, is_zero)| *is_zero) {
            return Err(ConfigValidationError::ZeroValue(field));
        }

        if self.sensitivity.levels.is_empty() {
            return Err(ConfigValidationError::NoSensitivityLevels);
        }

        let mut names = HashSet::new();
        for tool in &self.tools.search {
            if tool.name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyToolName);
            }
            if tool.source_kind.trim().is_empty() {
                return Err(ConfigValidationError::EmptySourceKind(tool.name.clone()));
            }
            if !names.insert(tool.name.as_str()) {
                return Err(ConfigValidationError::DuplicateToolName(tool.name.clone()));
            }
        }
        if self.tools.log_access && names.contains(crate::tools::LOG_ACCESS_TOOL) {
            return Err(ConfigValidationError::DuplicateToolName(
                crate::tools::LOG_ACCESS_TOOL.to_string(),
            ));
        }

        Ok(())
    }

    /// Complete run parameters, including the audit retry policy
    pub fn to_run_params(&self) -> RunParams {
        let policy = self.audit.retry_policy();
        self.agent
            .to_run_params()
            .with_audit_retry(policy.max_attempts, policy.backoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivist_domain::OutputFormat;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[agent]
max_steps = 6
step_timeout_secs = 20

[reasoning]
base_url = "http://localhost:8000/v1"
model = "qwen2.5-7b-instruct"

[retrieval]
corpus_path = "data/corpus.json"
top_k = 3

[audit]
dir = "/var/log/archivist"
max_attempts = 5

[sensitivity]
levels = ["public", "internal", "restricted"]
unrestricted = ["public"]

[tools]
log_access = false

[[tools.search]]
name = "search_policies"
description = "Search policy documents"
source_kind = "policy"

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agent.max_steps, 6);
        assert_eq!(config.agent.tool_timeout_secs, 30);
        assert_eq!(config.reasoning.model, "qwen2.5-7b-instruct");
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.max_excerpt_chars, 500);
        assert_eq!(config.audit.max_attempts, 5);
        assert_eq!(config.sensitivity.unrestricted, vec!["public"]);
        assert_eq!(config.tools.search.len(), 1);
        assert_eq!(config.tools.search[0].category_param, None);
        assert!(!config.tools.log_access);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.agent.max_steps, 10);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.audit.max_attempts, 3);
        assert_eq!(config.tools.search.len(), 2);
        assert!(config.tools.log_access);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_run_params() {
        let toml_str = r#"
[agent]
max_steps = 4
reasoning_backoff_ms = 10

[audit]
max_attempts = 7
backoff_ms = 5
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let params = config.to_run_params();
        assert_eq!(params.max_steps, 4);
        assert_eq!(params.reasoning_backoff, Duration::from_millis(10));
        assert_eq!(params.step_timeout, Duration::from_secs(60));
        assert_eq!(params.audit_max_attempts, 7);
        assert_eq!(params.audit_backoff, Duration::from_millis(5));
    }

    #[test]
    fn test_validate_zero_steps() {
        let toml_str = r#"
[agent]
max_steps = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::ZeroValue("agent.max_steps"))
        );
    }

    #[test]
    fn test_validate_zero_timeout() {
        let toml_str = r#"
[agent]
step_timeout_secs = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::ZeroValue("agent.step_timeout_secs"))
        ));
    }

    #[test]
    fn test_validate_zero_audit_attempts() {
        let toml_str = r#"
[audit]
max_attempts = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::ZeroValue("audit.max_attempts"))
        ));
    }

    #[test]
    fn test_validate_empty_tool_name() {
        let toml_str = r#"
[[tools.search]]
name = " "
description = "x"
source_kind = "manual"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyToolName));
    }

    #[test]
    fn test_validate_duplicate_tool_name() {
        let toml_str = r#"
[[tools.search]]
name = "log_access"
description = "x"
source_kind = "manual"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::DuplicateToolName(
                "log_access".to_string()
            ))
        );
    }
}
