//! Clock and identifier ports.
//!
//! Injected so that runs are reproducible under test.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait IdGenerator: Send + Sync {
    fn run_id(&self) -> String;

    /// Replacement for missing or duplicate tool call correlation ids
    fn correlation_id(&self) -> String;

    fn audit_id(&self) -> String;
}
