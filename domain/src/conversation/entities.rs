//! Conversation state entities

use crate::retrieval::entities::RetrievedRecord;
use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};

/// One entry in the conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    System {
        content: String,
    },
    User {
        content: String,
    },
    /// Model output; carries the tool requests made in that step, if any
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        result: ToolResult,
    },
    /// Corrective note appended after the model produced an unusable reply
    Note {
        content: String,
    },
}

/// Position in the transcript, captured before a reasoning call.
///
/// Everything before the mark is what the model saw for that call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ContextMark(usize);

impl ContextMark {
    pub fn position(&self) -> usize {
        self.0
    }
}

/// Append-only transcript owned by a single run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    turns: Vec<Turn>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Start a transcript with a system prompt and the user's question
    pub fn seeded(system_prompt: impl Into<String>, query: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.push(Turn::System {
            content: system_prompt.into(),
        });
        state.push(Turn::User {
            content: query.into(),
        });
        state
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn push_assistant(&mut self, content: impl Into<String>, tool_calls: Vec<ToolCall>) {
        self.push(Turn::Assistant {
            content: content.into(),
            tool_calls,
        });
    }

    pub fn push_tool_result(&mut self, result: ToolResult) {
        self.push(Turn::Tool { result });
    }

    pub fn push_note(&mut self, content: impl Into<String>) {
        self.push(Turn::Note {
            content: content.into(),
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Mark the current end of the transcript
    pub fn mark(&self) -> ContextMark {
        ContextMark(self.turns.len())
    }

    /// Records folded before the mark, in folding order
    pub fn records_visible_at(&self, mark: ContextMark) -> impl Iterator<Item = &RetrievedRecord> {
        self.turns[..mark.0.min(self.turns.len())]
            .iter()
            .filter_map(|turn| match turn {
                Turn::Tool { result } => Some(result.records()),
                _ => None,
            })
            .flatten()
    }

    /// All records folded so far
    pub fn records(&self) -> impl Iterator<Item = &RetrievedRecord> {
        self.records_visible_at(self.mark())
    }

    /// Most recent non-empty assistant text, if any
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.turns.iter().rev().find_map(|turn| match turn {
            Turn::Assistant { content, .. } if !content.trim().is_empty() => {
                Some(content.as_str())
            }
            _ => None,
        })
    }

    /// Number of tool requests made so far
    pub fn tool_call_count(&self) -> usize {
        self.turns
            .iter()
            .map(|turn| match turn {
                Turn::Assistant { tool_calls, .. } => tool_calls.len(),
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::value_objects::ToolPayload;

    fn search_result(source: &str) -> ToolResult {
        ToolResult::success(
            "search_manuals",
            ToolPayload::Records(vec![RetrievedRecord::new(
                source,
                "p. 1",
                "unclassified",
                0.5,
                "text",
            )]),
        )
    }

    #[test]
    fn test_seeded_state() {
        let state = ConversationState::seeded("system", "question");
        assert_eq!(state.len(), 2);
        assert!(matches!(state.turns()[0], Turn::System { .. }));
        assert!(matches!(state.turns()[1], Turn::User { .. }));
    }

    #[test]
    fn test_records_visible_at_mark() {
        let mut state = ConversationState::seeded("system", "question");
        state.push_tool_result(search_result("A"));
        let mark = state.mark();
        state.push_tool_result(search_result("B"));

        let visible: Vec<&str> = state
            .records_visible_at(mark)
            .map(|r| r.source_id.as_str())
            .collect();
        assert_eq!(visible, vec!["A"]);
        assert_eq!(state.records().count(), 2);
    }

    #[test]
    fn test_last_assistant_text_skips_empty() {
        let mut state = ConversationState::seeded("system", "question");
        assert!(state.last_assistant_text().is_none());
        state.push_assistant("Looking in the manuals.", vec![]);
        state.push_assistant("", vec![ToolCall::new("search_manuals")]);
        assert_eq!(state.last_assistant_text(), Some("Looking in the manuals."));
        assert_eq!(state.tool_call_count(), 1);
    }

    #[test]
    fn test_turn_serialization_tag() {
        let value = serde_json::to_value(Turn::Note {
            content: "fix".to_string(),
        })
        .unwrap();
        assert_eq!(value["role"], "note");
    }
}
