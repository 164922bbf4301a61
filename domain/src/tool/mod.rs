//! Tool domain module
//!
//! Abstractions for the agent's **closed tool set**: how the reasoning model
//! reaches retrieval and the audit trail in a validated way.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (request)    │    │ (folded)     │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Every tool has a [`ToolCapability`](entities::ToolCapability): `Search`
//! tools read from the retrieval collaborator, `Log` tools write to the audit
//! sink. New tools are added by registering a definition with one of those
//! handlers, never by reflection.
//!
//! - **Domain** (this module): definitions, validation, results; no I/O
//! - **Application** (`ToolExecutorPort`): port used by the orchestrator
//! - **Infrastructure** (`ToolRegistry`): concrete dispatch

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolCall, ToolCapability, ToolDefinition, ToolParameter, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolPayload, ToolResult, ToolResultMetadata};
