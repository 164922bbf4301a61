//! Reasoning client adapters

mod openai;

pub use openai::{OpenAiClientConfig, OpenAiCompatibleClient};
