//! Retrieval gateway adapters

mod corpus;

pub use corpus::{CorpusEntry, CorpusRetrievalGateway};
