//! Prompt templates for the answering agent

use crate::tool::entities::{ToolCapability, ToolSpec};

/// Templates for the answering agent's conversation
pub struct AnswerPromptTemplate;

impl AnswerPromptTemplate {
    /// System prompt placed first in every conversation.
    ///
    /// Lists the registered tools so the guidance stays in sync with the
    /// registry.
    pub fn system(tool_spec: &ToolSpec) -> String {
        let tool_descriptions = tool_spec
            .sorted()
            .into_iter()
            .map(|t| format!("- {}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n");

        let log_guideline = if tool_spec.with_capability(ToolCapability::Log).next().is_some() {
            "3. When you rely on restricted documents, use the log_access tool so the access is on record"
        } else {
            "3. Access to restricted documents is recorded automatically"
        };

        format!(
            r#"You are a reference assistant for staff who need accurate answers from manuals, procedures and doctrine documents.

Guidelines:
1. Prioritize accuracy over speed. If you are not certain, search for more information
2. Always cite sources with document name, location and sensitivity label
{log_guideline}
4. Synthesize information from multiple sources when needed
5. If an answer draws on restricted material, state its sensitivity label in your response
6. Be concise but comprehensive

Available tools:
{tool_descriptions}
"#
        )
    }

    /// Note appended when the model's reply could not be used
    pub fn malformed_reply(reason: &str) -> String {
        format!(
            "Your previous reply could not be processed ({reason}). \
             Reply either with tool calls using the declared schemas, or with a final answer in plain text."
        )
    }

    /// Note appended after a tool call failed argument validation
    pub fn invalid_arguments(tool_name: &str, message: &str) -> String {
        format!(
            "The call to {tool_name} was rejected: {message}. Check the tool's parameters before calling it again."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ToolDefinition, ToolParameter};

    fn spec(with_log: bool) -> ToolSpec {
        let mut spec = ToolSpec::new().register(
            ToolDefinition::new("search_manuals", "Search manuals", ToolCapability::Search)
                .with_parameter(ToolParameter::new("query", "Search query", true)),
        );
        if with_log {
            spec = spec.register(ToolDefinition::new(
                "log_access",
                "Record access to a restricted document",
                ToolCapability::Log,
            ));
        }
        spec
    }

    #[test]
    fn test_system_prompt_lists_tools() {
        let prompt = AnswerPromptTemplate::system(&spec(true));
        assert!(prompt.contains("- search_manuals: Search manuals"));
        assert!(prompt.contains("- log_access:"));
        assert!(prompt.contains("use the log_access tool"));
    }

    #[test]
    fn test_system_prompt_without_log_tool() {
        let prompt = AnswerPromptTemplate::system(&spec(false));
        assert!(prompt.contains("recorded automatically"));
        assert!(!prompt.contains("log_access"));
    }

    #[test]
    fn test_malformed_note_mentions_reason() {
        let note = AnswerPromptTemplate::malformed_reply("empty reply");
        assert!(note.contains("empty reply"));
    }
}
