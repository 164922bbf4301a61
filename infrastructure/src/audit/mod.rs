//! Audit sink adapters

mod jsonl_sink;
mod memory_sink;

pub use jsonl_sink::JsonlAuditSink;
pub use memory_sink::InMemoryAuditSink;
