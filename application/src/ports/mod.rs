//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod audit_sink;
pub mod clock;
pub mod reasoning_client;
pub mod retrieval_gateway;
pub mod run_progress;
pub mod tool_executor;
pub mod tool_schema;
