//! Type definitions for the agent orchestrator.

use crate::ports::audit_sink::{AuditError, AuditSink};
use crate::ports::clock::{Clock, IdGenerator};
use crate::ports::reasoning_client::{ReasoningClient, ReasoningError};
use crate::ports::tool_executor::ToolExecutorPort;
use archivist_domain::ConversationState;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Collaborators a run needs, passed in explicitly.
#[derive(Clone)]
pub struct AgentDeps {
    pub reasoning: Arc<dyn ReasoningClient>,
    pub tools: Arc<dyn ToolExecutorPort>,
    pub audit_sink: Arc<dyn AuditSink>,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
}

/// Component responsible for a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailingComponent {
    ReasoningClient,
    ToolRegistry,
    AuditSink,
    Orchestrator,
}

impl fmt::Display for FailingComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailingComponent::ReasoningClient => "reasoning client",
            FailingComponent::ToolRegistry => "tool registry",
            FailingComponent::AuditSink => "audit sink",
            FailingComponent::Orchestrator => "orchestrator",
        };
        f.write_str(name)
    }
}

/// What made a run fail
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentErrorKind {
    #[error("reasoning failed after {attempts} attempts: {last}")]
    ExhaustedRetries { attempts: u32, last: ReasoningError },

    #[error("reasoning reply still malformed after a corrective retry: {0}")]
    ReasoningMalformed(String),

    #[error("arguments for '{tool}' failed validation twice in a row: {message}")]
    InvalidToolArguments { tool: String, message: String },

    #[error("audit write failed: {0}")]
    AuditWriteFailed(#[from] AuditError),

    #[error("invalid run parameters: {0}")]
    InvalidParams(String),

    #[error("run cancelled")]
    Cancelled,
}

impl AgentErrorKind {
    pub fn component(&self) -> FailingComponent {
        match self {
            AgentErrorKind::ExhaustedRetries { .. } | AgentErrorKind::ReasoningMalformed(_) => {
                FailingComponent::ReasoningClient
            }
            AgentErrorKind::InvalidToolArguments { .. } => FailingComponent::ToolRegistry,
            AgentErrorKind::AuditWriteFailed(_) => FailingComponent::AuditSink,
            AgentErrorKind::InvalidParams(_) | AgentErrorKind::Cancelled => {
                FailingComponent::Orchestrator
            }
        }
    }
}

/// Fatal run error.
///
/// Carries everything the run had when it stopped: no answer is returned
/// alongside it.
#[derive(Error, Debug, Clone)]
#[error("run {run_id} failed at step {step} in {component}: {kind}")]
pub struct AgentError {
    pub kind: AgentErrorKind,
    pub run_id: String,
    pub step: usize,
    pub component: FailingComponent,
    pub conversation: ConversationState,
    /// Audit records acknowledged before the failure
    pub audit_ids: Vec<String>,
}

impl AgentError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, AgentErrorKind::Cancelled)
    }
}
