//! Retrieval domain
//!
//! Types describing what the retrieval collaborator hands back to the agent.
//! The agent never ranks, filters or rewrites these records: ranking belongs
//! to the retrieval backend, and the source identifier and sensitivity label
//! must reach citations and audit records exactly as retrieved.

pub mod entities;
pub mod sensitivity;

pub use entities::{RetrievedRecord, SearchFilters};
pub use sensitivity::{SensitivityLabel, SensitivityPolicy};
