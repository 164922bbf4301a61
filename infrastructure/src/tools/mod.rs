//! Tools exposed to the reasoning model
//!
//! The set is closed: search tools over the retrieval gateway, and the
//! explicit `log_access` tool over the run's audit ledger.

pub mod access_log;
pub mod catalog;
pub mod search;

mod registry;
mod schema;

pub use access_log::AccessLogTool;
pub use catalog::{build_registry, log_access_definition, search_definition};
pub use registry::{RegistryError, ToolHandler, ToolRegistry};
pub use schema::JsonSchemaToolConverter;
pub use search::SearchTool;

/// Name of the explicit access logging tool
pub const LOG_ACCESS_TOOL: &str = "log_access";
