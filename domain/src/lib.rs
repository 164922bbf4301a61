//! Domain layer for archivist
//!
//! Core types and rules of the audited answering agent. This crate has no
//! I/O and no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Records and sensitivity
//!
//! Retrieval hands back [`RetrievedRecord`]s carrying a verbatim
//! [`SensitivityLabel`]. The [`SensitivityPolicy`] decides which labels are
//! restricted; every restricted record shown to the model yields exactly one
//! [`AuditRecord`] per actor and source within a run.
//!
//! ## Conversation and citations
//!
//! A run folds tool results into an append-only [`ConversationState`].
//! Citations come from the records visible when the final answer was
//! produced, through [`CitationExtractor`].

pub mod audit;
pub mod citation;
pub mod config;
pub mod conversation;
pub mod core;
pub mod prompt;
pub mod retrieval;
pub mod run;
pub mod tool;

// Re-export commonly used types
pub use audit::{AuditAction, AuditFilter, AuditKey, AuditReceipt, AuditRecord};
pub use citation::{Citation, CitationExtractor};
pub use config::OutputFormat;
pub use conversation::{
    ContentBlock, ContextBudget, ContextMark, ConversationState, ReasoningReply, StopReason, Turn,
};
pub use core::{error::DomainError, query::Query};
pub use prompt::AnswerPromptTemplate;
pub use retrieval::{RetrievedRecord, SearchFilters, SensitivityLabel, SensitivityPolicy};
pub use run::{RunPhase, RunResult, TerminationReason};
pub use tool::{
    DefaultToolValidator, ToolCall, ToolCapability, ToolDefinition, ToolError, ToolParameter,
    ToolPayload, ToolResult, ToolResultMetadata, ToolSpec, ToolValidator,
};
