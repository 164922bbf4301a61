//! Query value object

use crate::core::error::DomainError;
use crate::retrieval::sensitivity::SensitivityLabel;
use serde::{Deserialize, Serialize};

/// A question posed by an actor (Value Object)
///
/// Created once per run and never mutated by the agent. The clearance is the
/// highest sensitivity label the actor may see; it is checked upstream and
/// only forwarded to retrieval as a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    actor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    clearance: Option<SensitivityLabel>,
}

impl Query {
    /// Create a new query, rejecting blank text or a blank actor
    pub fn new(text: impl Into<String>, actor: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        let actor = actor.into();
        if text.trim().is_empty() {
            return Err(DomainError::InvalidQuery(
                "query text cannot be empty".to_string(),
            ));
        }
        if actor.trim().is_empty() {
            return Err(DomainError::InvalidActor(
                "actor identifier cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            text,
            actor,
            clearance: None,
        })
    }

    pub fn with_clearance(mut self, clearance: SensitivityLabel) -> Self {
        self.clearance = Some(clearance);
        self
    }

    /// Get the query text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the acting user's identifier
    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn clearance(&self) -> Option<&SensitivityLabel> {
        self.clearance.as_ref()
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
