//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async ToolExecutorPort is defined in the application layer (ports).

use super::entities::{ToolCall, ToolDefinition, ToolParameter};

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator: Send + Sync {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
///
/// Checks required parameters, unknown parameters, JSON types and
/// closed value sets, in that order.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl DefaultToolValidator {
    fn check_value(
        param: &ToolParameter,
        value: &serde_json::Value,
        tool: &str,
    ) -> Result<(), String> {
        let type_ok = match param.param_type.as_str() {
            "integer" => value.is_i64() || value.is_u64(),
            "number" => value.is_number(),
            "boolean" => value.is_boolean(),
            _ => value.is_string(),
        };
        if !type_ok {
            return Err(format!(
                "Parameter '{}' for tool '{}' must be of type {}",
                param.name, tool, param.param_type
            ));
        }

        if !param.allowed_values.is_empty() {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if !param
                .allowed_values
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&text))
            {
                return Err(format!(
                    "Parameter '{}' for tool '{}' must be one of: {}",
                    param.name,
                    tool,
                    param.allowed_values.join(", ")
                ));
            }
        }

        Ok(())
    }
}

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        // Check that all required parameters are present
        for param in &definition.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, definition.name
                ));
            }
        }

        // Check every provided argument against its declaration
        for (arg_name, value) in &call.arguments {
            let Some(param) = definition.parameter(arg_name) else {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            };
            Self::check_value(param, value, &definition.name)?;
        }

        Ok(())
    }
}
