//! Retrieval over a local corpus file.
//!
//! The corpus is a JSON array or JSON-lines file of passages. Ranking is
//! plain term overlap between the query and the passage text; good enough
//! for demos and tests, and replaceable by any other [`RetrievalGateway`].

use archivist_application::{RetrievalError, RetrievalGateway};
use archivist_domain::{RetrievedRecord, SearchFilters, SensitivityLabel, SensitivityPolicy};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// One indexed passage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    #[serde(alias = "manual_name", alias = "document_id")]
    pub source_id: String,
    /// Free-form location; built from `page` and `section` when absent
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(alias = "classification")]
    pub sensitivity_label: SensitivityLabel,
    #[serde(alias = "document_type")]
    pub source_kind: String,
    /// Manual type, doctrine area or similar
    #[serde(default, alias = "manual_type", alias = "doctrine_area")]
    pub category: Option<String>,
    pub text: String,
}

impl CorpusEntry {
    fn location(&self) -> String {
        if let Some(location) = &self.location {
            return location.clone();
        }
        match (self.page, &self.section) {
            (Some(page), Some(section)) => format!("p. {}, {}", page, section),
            (Some(page), None) => format!("p. {}", page),
            (None, Some(section)) => section.clone(),
            (None, None) => String::new(),
        }
    }
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(|t| t.to_lowercase())
        .collect()
}

pub struct CorpusRetrievalGateway {
    entries: Vec<CorpusEntry>,
    policy: SensitivityPolicy,
}

impl CorpusRetrievalGateway {
    pub fn new(entries: Vec<CorpusEntry>) -> Self {
        Self {
            entries,
            policy: SensitivityPolicy::default(),
        }
    }

    /// Policy used to compare labels against a clearance ceiling
    pub fn with_policy(mut self, policy: SensitivityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Load a JSON array or JSON-lines corpus file
    pub fn from_path(path: &Path) -> Result<Self, RetrievalError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RetrievalError::Backend(format!("could not read corpus {}: {}", path.display(), e))
        })?;
        let entries = Self::parse(&content)?;
        info!(path = %path.display(), entries = entries.len(), "loaded corpus");
        Ok(Self::new(entries))
    }

    fn parse(content: &str) -> Result<Vec<CorpusEntry>, RetrievalError> {
        if content.trim_start().starts_with('[') {
            return serde_json::from_str(content)
                .map_err(|e| RetrievalError::Backend(format!("invalid corpus: {}", e)));
        }
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| {
                    RetrievalError::Backend(format!("invalid corpus line {}: {}", index + 1, e))
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn admits(&self, entry: &CorpusEntry, filters: &SearchFilters) -> bool {
        let kind_ok = filters
            .source_kind
            .as_ref()
            .is_none_or(|kind| kind.eq_ignore_ascii_case(&entry.source_kind));
        let category_ok = filters.category.as_ref().is_none_or(|wanted| {
            entry
                .category
                .as_ref()
                .is_some_and(|c| c.eq_ignore_ascii_case(wanted))
        });
        let ceiling_ok = filters
            .sensitivity_ceiling
            .as_ref()
            .is_none_or(|ceiling| self.policy.within_ceiling(&entry.sensitivity_label, ceiling));
        kind_ok && category_ok && ceiling_ok
    }
}

#[async_trait]
impl RetrievalGateway for CorpusRetrievalGateway {
    async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        top_k: usize,
    ) -> Result<Vec<RetrievedRecord>, RetrievalError> {
        let query_terms = terms(query);
        if query_terms.is_empty() {
            return Err(RetrievalError::InvalidRequest(
                "query has no searchable terms".to_string(),
            ));
        }

        let mut scored: Vec<(f64, &CorpusEntry)> = self
            .entries
            .iter()
            .filter(|entry| self.admits(entry, filters))
            .filter_map(|entry| {
                let overlap = terms(&entry.text).intersection(&query_terms).count();
                (overlap > 0).then(|| (overlap as f64 / query_terms.len() as f64, entry))
            })
            .collect();
        // Stable: ties keep corpus order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(top_k);

        debug!(query, matched = scored.len(), top_k, "corpus search");
        Ok(scored
            .into_iter()
            .map(|(score, entry)| {
                RetrievedRecord::new(
                    &entry.source_id,
                    entry.location(),
                    entry.sensitivity_label.clone(),
                    (score * 1000.0).round() / 1000.0,
                    &entry.text,
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CORPUS: &str = r#"
{"manual_name": "TM-9-2320", "page": 12, "section": "3.2 Wheel Assembly", "classification": "unclassified", "document_type": "manual", "manual_type": "maintenance", "text": "Torque the lug nuts to 55 ft-lb in a star pattern."}
{"manual_name": "FM-3-21", "page": 4, "section": "Movement", "classification": "secret", "document_type": "doctrine", "doctrine_area": "tactics", "text": "Squad movement techniques in wooded terrain."}
{"manual_name": "TM-9-2320-S", "location": "Annex B", "classification": "confidential", "document_type": "manual", "manual_type": "safety", "text": "Wear gloves when applying torque to hot lug nuts."}
"#;

    fn gateway() -> CorpusRetrievalGateway {
        CorpusRetrievalGateway::new(CorpusRetrievalGateway::parse(CORPUS).unwrap())
    }

    #[tokio::test]
    async fn test_ranks_by_overlap() {
        let results = gateway()
            .search("torque lug nuts", &SearchFilters::new(), 5)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source_id, "TM-9-2320");
        assert_eq!(results[0].location, "p. 12, 3.2 Wheel Assembly");
        assert_eq!(results[1].location, "Annex B");
        assert_eq!(results[1].sensitivity_label.as_str(), "confidential");
    }

    #[tokio::test]
    async fn test_filters_by_kind_and_category() {
        let gw = gateway();
        let doctrine = gw
            .search(
                "movement torque",
                &SearchFilters::new().with_source_kind("doctrine"),
                5,
            )
            .await
            .unwrap();
        assert_eq!(doctrine.len(), 1);
        assert_eq!(doctrine[0].source_id, "FM-3-21");

        let safety = gw
            .search(
                "torque",
                &SearchFilters::new()
                    .with_source_kind("manual")
                    .with_category("safety"),
                5,
            )
            .await
            .unwrap();
        assert_eq!(safety.len(), 1);
        assert_eq!(safety[0].source_id, "TM-9-2320-S");
    }

    #[tokio::test]
    async fn test_ceiling_excludes_higher_labels() {
        let results = gateway()
            .search(
                "torque lug nuts",
                &SearchFilters::new().with_ceiling(Some("unclassified".into())),
                5,
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source_id, "TM-9-2320");
    }

    #[tokio::test]
    async fn test_top_k_caps_results() {
        let results = gateway()
            .search("torque", &SearchFilters::new(), 1)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_query_is_invalid() {
        let err = gateway()
            .search("  ?! ", &SearchFilters::new(), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidRequest(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_load_json_array_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"source_id": "X-1", "sensitivity_label": "public", "source_kind": "manual", "text": "alpha"}}]"#
        )
        .unwrap();

        let gw = CorpusRetrievalGateway::from_path(file.path()).unwrap();
        assert_eq!(gw.len(), 1);
    }

    #[test]
    fn test_load_reports_bad_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"source_id\": \"X-1\"}}").unwrap();

        let err = CorpusRetrievalGateway::from_path(file.path()).err().unwrap();
        assert!(err.to_string().contains("line 1"));
    }
}
