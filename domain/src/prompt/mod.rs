//! Prompt domain
//!
//! System prompt and corrective notes sent to the reasoning model.

mod answer;

pub use answer::AnswerPromptTemplate;
