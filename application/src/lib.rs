//! Application layer for archivist
//!
//! This crate contains the orchestrator use case, the per-run audit ledger,
//! port definitions and run parameters. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::RunParams;
pub use ports::{
    audit_sink::{AuditError, AuditSink},
    clock::{Clock, IdGenerator},
    reasoning_client::{ReasoningClient, ReasoningError},
    retrieval_gateway::{RetrievalError, RetrievalGateway},
    run_progress::{NoRunProgress, RunProgressNotifier},
    tool_executor::{DispatchContext, ToolExecutorPort},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::audit_ledger::{AuditLedger, AuditRetryPolicy};
pub use use_cases::list_audit::ListAuditUseCase;
pub use use_cases::run_agent::{
    AgentDeps, AgentError, AgentErrorKind, AgentOrchestrator, FailingComponent,
};
