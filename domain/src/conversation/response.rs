//! Structured replies from the reasoning model.
//!
//! A reply is a list of content blocks mixing text with tool requests. The
//! orchestrator treats a reply with tool requests as "keep going" and a reply
//! with text only as the final answer.

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single block of content within a reasoning reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },

    /// A tool request. `id` may be empty when the endpoint does not assign one.
    ToolUse {
        id: String,
        name: String,
        input: HashMap<String, serde_json::Value>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn tool_use(
        id: impl Into<String>,
        name: impl Into<String>,
        input: HashMap<String, serde_json::Value>,
    ) -> Self {
        ContentBlock::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    Other(String),
}

/// One reply from the reasoning collaborator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReasoningReply {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    pub model: Option<String>,
}

impl ReasoningReply {
    /// Text-only reply
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// Reply requesting tools, with optional leading text
    pub fn with_tool_calls(text: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        let text = text.into();
        let mut content = Vec::with_capacity(calls.len() + 1);
        if !text.is_empty() {
            content.push(ContentBlock::text(text));
        }
        content.extend(
            calls
                .into_iter()
                .map(|c| ContentBlock::tool_use(c.correlation_id, c.tool_name, c.arguments)),
        );
        Self {
            content,
            stop_reason: Some(StopReason::ToolUse),
            model: None,
        }
    }

    /// Concatenate all text blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Tool requests in the order the model emitted them
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => Some(ToolCall {
                    correlation_id: id.clone(),
                    tool_name: name.clone(),
                    arguments: input.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }

    /// A reply with neither tool requests nor text carries nothing usable
    pub fn is_empty(&self) -> bool {
        !self.has_tool_calls() && self.text_content().trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_creates_final_answer() {
        let reply = ReasoningReply::from_text("Torque to 45 Nm.");
        assert_eq!(reply.text_content(), "Torque to 45 Nm.");
        assert!(!reply.has_tool_calls());
        assert!(!reply.is_empty());
        assert_eq!(reply.stop_reason, Some(StopReason::EndTurn));
    }

    #[test]
    fn tool_calls_keep_emission_order() {
        let reply = ReasoningReply::with_tool_calls(
            "Searching.",
            vec![
                ToolCall::new("search_manuals")
                    .with_id("c1")
                    .with_arg("query", "torque"),
                ToolCall::new("search_doctrine")
                    .with_id("c2")
                    .with_arg("query", "convoy"),
            ],
        );

        let calls = reply.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].correlation_id, "c1");
        assert_eq!(calls[0].get_string("query"), Some("torque"));
        assert_eq!(calls[1].tool_name, "search_doctrine");
        assert_eq!(reply.text_content(), "Searching.");
    }

    #[test]
    fn empty_reply_is_unusable() {
        assert!(ReasoningReply::default().is_empty());
        assert!(ReasoningReply::from_text("   ").is_empty());
    }
}
