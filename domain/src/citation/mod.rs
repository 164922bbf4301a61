//! Citation extraction
//!
//! Citations are derived from the records the model actually saw, never from
//! the answer text. One citation per distinct source id, in the order the
//! source first appeared in the conversation.

use crate::retrieval::entities::RetrievedRecord;
use crate::retrieval::sensitivity::SensitivityLabel;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A source reference attached to the final answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub source_id: String,
    pub location: String,
    pub sensitivity_label: SensitivityLabel,
}

impl From<&RetrievedRecord> for Citation {
    fn from(record: &RetrievedRecord) -> Self {
        Self {
            source_id: record.source_id.clone(),
            location: record.location.clone(),
            sensitivity_label: record.sensitivity_label.clone(),
        }
    }
}

/// Pure, deterministic citation derivation.
pub struct CitationExtractor;

impl CitationExtractor {
    /// Build citations from the records visible when the answer was produced.
    ///
    /// The answer text is accepted for symmetry with the caller but not
    /// inspected: no matching of prose against sources is attempted.
    pub fn extract<'a, I>(records: I, _answer: &str) -> Vec<Citation>
    where
        I: IntoIterator<Item = &'a RetrievedRecord>,
    {
        let mut seen = HashSet::new();
        records
            .into_iter()
            .filter(|r| seen.insert(r.source_id.clone()))
            .map(Citation::from)
            .collect()
    }
}
