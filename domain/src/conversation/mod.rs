//! Conversation domain
//!
//! The per-run transcript the reasoning model sees, the structured reply it
//! returns, and the context budget that bounds how many retrieved records are
//! folded into the transcript.

pub mod budget;
pub mod entities;
pub mod response;

pub use budget::ContextBudget;
pub use entities::{ContextMark, ConversationState, Turn};
pub use response::{ContentBlock, ReasoningReply, StopReason};
