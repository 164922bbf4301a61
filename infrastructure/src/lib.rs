//! Infrastructure layer for archivist
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the tool registry and its handlers, audit sinks, the
//! corpus retrieval gateway, the reasoning HTTP client and configuration
//! file loading.

pub mod audit;
pub mod config;
pub mod reasoning;
pub mod retrieval;
pub mod system;
pub mod tools;

#[cfg(test)]
mod scenarios;

// Re-export commonly used types
pub use audit::{InMemoryAuditSink, JsonlAuditSink};
pub use config::{ConfigLoader, ConfigValidationError, FileConfig, FileOutputConfig};
pub use reasoning::{OpenAiClientConfig, OpenAiCompatibleClient};
pub use retrieval::{CorpusEntry, CorpusRetrievalGateway};
pub use system::{SystemClock, UuidIdGenerator};
pub use tools::{
    JsonSchemaToolConverter, RegistryError, ToolHandler, ToolRegistry, build_registry,
};
