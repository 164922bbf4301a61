//! Run domain
//!
//! Phases of a single orchestration run and the result handed to the caller.

pub mod entities;

pub use entities::{RunPhase, RunResult, TerminationReason};
