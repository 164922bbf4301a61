//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod audit_ledger;
pub mod list_audit;
pub mod run_agent;
pub(crate) mod shared;
