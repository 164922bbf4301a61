//! Wall clock and random identifiers for production runs

use archivist_application::{Clock, IdGenerator};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Random v4 UUIDs, prefixed by kind so ids are recognizable in logs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn run_id(&self) -> String {
        format!("run-{}", Uuid::new_v4())
    }

    fn correlation_id(&self) -> String {
        format!("call-{}", Uuid::new_v4().simple())
    }

    fn audit_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
