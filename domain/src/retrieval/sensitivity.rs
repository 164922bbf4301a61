//! Sensitivity labels and the policy deciding which of them require auditing.

use serde::{Deserialize, Serialize};

/// Classification tag attached to a retrieved record.
///
/// Stored verbatim: comparisons are case-insensitive, but the original
/// spelling is what gets cited and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensitivityLabel(String);

impl SensitivityLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn matches(&self, other: &str) -> bool {
        self.0.trim().eq_ignore_ascii_case(other.trim())
    }
}

impl std::fmt::Display for SensitivityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SensitivityLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SensitivityLabel {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Decides which labels are restricted and how labels order against a clearance.
///
/// Any label not listed as unrestricted is treated as restricted, including
/// labels the policy has never heard of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityPolicy {
    /// Known levels, lowest first
    pub levels: Vec<String>,
    /// Labels that can be shown without an audit record
    pub unrestricted: Vec<String>,
}

impl Default for SensitivityPolicy {
    fn default() -> Self {
        Self {
            levels: vec![
                "unclassified".to_string(),
                "confidential".to_string(),
                "secret".to_string(),
                "top_secret".to_string(),
            ],
            unrestricted: vec!["unclassified".to_string(), "public".to_string()],
        }
    }
}

impl SensitivityPolicy {
    /// Whether surfacing a record with this label must be audited
    pub fn is_restricted(&self, label: &SensitivityLabel) -> bool {
        !self.unrestricted.iter().any(|u| label.matches(u))
    }

    /// Position of the label in the ordered level list
    pub fn rank(&self, label: &SensitivityLabel) -> Option<usize> {
        self.levels.iter().position(|l| label.matches(l))
    }

    pub fn is_known(&self, label: &SensitivityLabel) -> bool {
        self.rank(label).is_some()
    }

    /// Whether a label is at or below the given clearance.
    ///
    /// Unknown labels never satisfy a ceiling unless they equal it.
    pub fn within_ceiling(&self, label: &SensitivityLabel, ceiling: &SensitivityLabel) -> bool {
        match (self.rank(label), self.rank(ceiling)) {
            (Some(l), Some(c)) => l <= c,
            _ => label.matches(ceiling.as_str()),
        }
    }
}
