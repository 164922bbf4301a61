//! Reasoning phase: one model call per step, with retries.

use super::{AgentErrorKind, AgentOrchestrator};
use crate::ports::reasoning_client::ReasoningError;
use crate::ports::run_progress::RunProgressNotifier;
use crate::use_cases::shared::cancellable;
use archivist_domain::{
    AnswerPromptTemplate, ContextMark, ConversationState, ReasoningReply, ToolDefinition,
};
use std::time::Duration;
use tracing::{debug, warn};

impl AgentOrchestrator {
    /// Obtain a usable reply for the current step.
    ///
    /// Timeouts and transport failures are retried with exponential backoff
    /// up to `reasoning_retries`. A malformed reply gets a corrective note
    /// and another call, up to `malformed_retries`. Returns the reply and the
    /// context mark taken before the call that produced it.
    pub(super) async fn reason(
        &self,
        conversation: &mut ConversationState,
        tools: &[ToolDefinition],
        step_timeout: Duration,
        progress: &dyn RunProgressNotifier,
    ) -> Result<(ReasoningReply, ContextMark), AgentErrorKind> {
        let mut attempts = 0u32;
        let mut retries = 0u32;
        let mut corrections = 0u32;

        loop {
            attempts += 1;
            let mark = conversation.mark();
            let call = tokio::time::timeout(
                step_timeout,
                self.deps.reasoning.complete(conversation, tools),
            );
            let outcome = match cancellable(&self.cancellation_token, call).await? {
                Ok(result) => result,
                Err(_) => Err(ReasoningError::Timeout),
            };

            let failure = match outcome.and_then(check_reply) {
                Ok(reply) => {
                    debug!(
                        attempts,
                        tool_calls = reply.tool_calls().len(),
                        "reasoning reply received"
                    );
                    return Ok((reply, mark));
                }
                Err(e) => e,
            };

            if failure.is_retryable() {
                if retries >= self.params.reasoning_retries {
                    return Err(AgentErrorKind::ExhaustedRetries {
                        attempts,
                        last: failure,
                    });
                }
                retries += 1;
                let delay = self.params.reasoning_delay(retries);
                warn!(
                    retry = retries,
                    max_retries = self.params.reasoning_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %failure,
                    "reasoning call failed, retrying"
                );
                progress.on_reasoning_retry(
                    retries,
                    self.params.reasoning_retries,
                    &failure.to_string(),
                );
                cancellable(&self.cancellation_token, tokio::time::sleep(delay)).await?;
                continue;
            }

            let reason = match failure {
                ReasoningError::Malformed(reason) => reason,
                other => other.to_string(),
            };
            if corrections >= self.params.malformed_retries {
                return Err(AgentErrorKind::ReasoningMalformed(reason));
            }
            corrections += 1;
            warn!(reason = %reason, "malformed reasoning reply, sending corrective note");
            conversation.push_note(AnswerPromptTemplate::malformed_reply(&reason));
            progress.on_corrective_note(&reason);
        }
    }
}

/// Reject replies the loop cannot act on.
fn check_reply(reply: ReasoningReply) -> Result<ReasoningReply, ReasoningError> {
    if reply.is_empty() {
        return Err(ReasoningError::Malformed(
            "reply had neither text nor tool calls".to_string(),
        ));
    }
    if reply
        .tool_calls()
        .iter()
        .any(|c| c.tool_name.trim().is_empty())
    {
        return Err(ReasoningError::Malformed(
            "tool call without a tool name".to_string(),
        ));
    }
    Ok(reply)
}
