//! Retrieval entities

use super::sensitivity::SensitivityLabel;
use serde::{Deserialize, Serialize};

/// A ranked passage returned by the retrieval collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedRecord {
    /// Identifier of the source document (e.g. manual name)
    pub source_id: String,
    /// Where in the source the excerpt lives (e.g. "p. 12, §3.2")
    pub location: String,
    /// Classification of the source, verbatim from retrieval
    pub sensitivity_label: SensitivityLabel,
    /// Relevance score as reported by retrieval; never re-ranked here
    pub score: f64,
    /// Passage text shown to the model
    pub excerpt: String,
}

impl RetrievedRecord {
    pub fn new(
        source_id: impl Into<String>,
        location: impl Into<String>,
        sensitivity_label: impl Into<SensitivityLabel>,
        score: f64,
        excerpt: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            location: location.into(),
            sensitivity_label: sensitivity_label.into(),
            score,
            excerpt: excerpt.into(),
        }
    }
}

/// Filters forwarded to the retrieval collaborator alongside the query text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Kind of source to search (e.g. "manual", "doctrine")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_kind: Option<String>,
    /// Optional category within the source kind (e.g. "maintenance")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Highest label the actor is cleared for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity_ceiling: Option<SensitivityLabel>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_kind(mut self, kind: impl Into<String>) -> Self {
        self.source_kind = Some(kind.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_ceiling(mut self, ceiling: Option<SensitivityLabel>) -> Self {
        self.sensitivity_ceiling = ceiling;
        self
    }
}
