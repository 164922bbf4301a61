//! Reasoning client port
//!
//! Wraps the generation model. The model is a black box: given the
//! conversation so far and the declared tools, it returns either a final
//! message or a list of tool requests.

use archivist_domain::conversation::{ConversationState, ReasoningReply};
use archivist_domain::tool::entities::ToolDefinition;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during a reasoning call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReasoningError {
    #[error("reasoning call timed out")]
    Timeout,

    /// The endpoint answered, but the reply could not be interpreted
    #[error("malformed reasoning reply: {0}")]
    Malformed(String),

    #[error("reasoning transport error: {0}")]
    Transport(String),
}

impl ReasoningError {
    /// Timeouts and transport failures share the retry budget
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReasoningError::Timeout | ReasoningError::Transport(_))
    }
}

#[async_trait]
pub trait ReasoningClient: Send + Sync {
    /// Produce the next reply for the conversation.
    async fn complete(
        &self,
        conversation: &ConversationState,
        tools: &[ToolDefinition],
    ) -> Result<ReasoningReply, ReasoningError>;
}
