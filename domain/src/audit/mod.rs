//! Audit domain
//!
//! Compliance records emitted when restricted material is surfaced to the
//! reasoning model. Records are immutable once built; durability is the
//! audit sink's job, deduplication is the run ledger's job.

pub mod entities;

pub use entities::{AuditAction, AuditFilter, AuditKey, AuditReceipt, AuditRecord};
